pub mod advisor_service;
pub mod analytics_service;
pub mod chart_service;
pub mod finance_service;
pub mod settings_service;
