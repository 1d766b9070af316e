/// Role that grants admin privileges on its own, independent of the `admin` flag.
/// Matched case-sensitively.
pub const ROLE_ADMIN: &str = "ADMIN";
