use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Employee directory entry. The attendance core only reads it: the sweep
/// needs ids of active employees per tenant, notifications need name/email.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "ACME")]
    pub company_code: String,

    #[schema(example = "John")]
    pub first_name: String,

    #[schema(example = "Doe", nullable = true)]
    pub last_name: Option<String>,

    #[schema(example = "john.doe@company.com")]
    pub email: String,

    #[schema(example = "active")]
    pub status: String,
}
