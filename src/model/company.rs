use serde::{Deserialize, Serialize};

/// Tenant registry row. The sweep enumerates active companies; everything
/// else treats the code as an opaque filter key.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub code: String,
    pub name: String,
    pub is_active: bool,
}
