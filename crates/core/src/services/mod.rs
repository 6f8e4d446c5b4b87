pub mod aggregation_service;
pub mod anomaly_service;
pub mod budget_service;
pub mod correlation_service;
pub mod forecast_service;
pub mod health_service;
pub mod leak_service;
pub mod seasonality_service;
pub mod suggestion_service;
