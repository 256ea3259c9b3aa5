pub mod complex;
pub mod coordinator;
pub mod eft;
pub mod error;
pub mod escape;
pub mod extended;
pub mod gesture;
pub mod palette_id;
pub mod policy;
pub mod session;
pub mod share;
pub mod view;

// Re-export primary types for convenience.
pub use complex::{ComplexExtended, HostComplex};
pub use coordinator::{Coordinator, FrameParams, FrameScale};
pub use eft::{NativeFloat, Splitter};
pub use error::CoreError;
pub use escape::{iterate, smooth_value, IterationResult};
pub use extended::{ExtendedReal, HostReal, Partial, PrecisionTier, Rigorous, Tier};
pub use gesture::{ContactId, GestureState};
pub use palette_id::PaletteId;
pub use policy::IterationPolicy;
pub use session::{FrameSnapshot, RedrawScheduler, Session};
pub use view::{NudgeDirection, Screen, ViewEvent, ViewSnapshot, ViewState};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
