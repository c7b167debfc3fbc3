pub mod consumption;
pub mod reservation;
pub mod roster;
pub mod session;
pub mod student;

pub use consumption::Consumption;
pub use reservation::{MealKind, Reservation};
pub use roster::{EligibleStudent, ServedRow, TargetServed, NO_RESERVATION};
pub use session::{NewSession, Session, SessionContext};
pub use student::{Group, Student};

/// Row identifier allocated by the registry. Registration codes, not these
/// ids, are the stable external key for students.
pub type RecordId = u64;
