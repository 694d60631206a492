use deals_portal::session::hash_password;

/// Prints an Argon2id hash for provisioning a `users.password_hash` value.
///
/// Usage: `hash_password <password>`
fn main() {
    let Some(password) = std::env::args().nth(1) else {
        eprintln!("usage: hash_password <password>");
        std::process::exit(2);
    };

    match hash_password(&password) {
        Ok(hash) => println!("{}", hash),
        Err(e) => {
            eprintln!("failed to hash password: {}", e);
            std::process::exit(1);
        }
    }
}
