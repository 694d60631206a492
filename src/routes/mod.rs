/// Router Module Index
///
/// Splits the route table by access level so authentication is applied once, at the
/// module boundary, rather than per handler.

/// Routes reachable without a session: health, the auth bridge and legacy redirects.
pub mod public;

/// Page routes, wrapped in the `AuthUser` middleware.
pub mod authenticated;
