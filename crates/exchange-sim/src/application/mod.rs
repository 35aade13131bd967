mod venue;

pub use venue::SimVenue;
