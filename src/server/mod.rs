pub mod router;

pub use router::{SchoolState, school_router};
