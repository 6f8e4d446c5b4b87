pub mod budget;
pub mod insight;
pub mod ledger;
pub mod series;
pub mod transaction;
