//! Exchange Sim
//!
//! An in-memory venue implementing the ballast ports. It keeps a quoted
//! book per symbol, fills market orders immediately at the touch, marks
//! portfolios at the last trade and records every request an agent makes
//! so a driver can answer it later.

// Application layer
pub mod application;

// Infrastructure layer
pub mod infrastructure;

// Cross-cutting concerns
pub mod error;
pub mod model;

// Re-export main types for convenience
pub use application::SimVenue;
pub use infrastructure::VenueSession;
pub use model::MarketHours;
