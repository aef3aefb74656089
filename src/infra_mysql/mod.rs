mod account_repo_mysql;
mod user_repo_mysql;

pub use account_repo_mysql::*;
pub use user_repo_mysql::*;
