mod session;

pub use session::VenueSession;
