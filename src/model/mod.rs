//! Domain records consumed by the synthesis engine.
//!
//! All records are read-only inputs: the engine renders them and never writes
//! them back.

mod application;
mod business_trip;
pub mod codes;
mod travel_invoice;

pub use application::{
    Application, ApplicationDetails, OtherReasonDetails, SchoolEventDetails, TeacherDetail,
    TrainingDetails,
};
pub use business_trip::{BusinessTripApplication, TeacherIdentity};
pub use codes::*;
pub use travel_invoice::{Calculation, Row, TravelInvoice};
