//! Single-touch transform box engine.
//!
//! Items live inside a bounded parent region. One finger drags an editable
//! item, and the same finger placed on the item's bottom-end handle rotates
//! and zooms it around its center. Items never leave the parent. A separate
//! viewport pinch-zooms and pans the whole scene while no item gesture is
//! live. The engine is renderer independent: the host feeds it pointer
//! events and layout measurements and draws from the [`engine::Action`]s and
//! layer transforms it returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Event routing and the host-facing [`engine::EngineCore`] |
//! | [`state`] | Item records and the collection that owns them |
//! | [`gesture`] | Single-pointer gesture state machine for one item |
//! | [`transform`] | Applies gesture deltas with parent clamping; render transforms |
//! | [`viewport`] | Whole-scene pinch-zoom and pan |
//! | [`hit`] | Hit-testing items and their corner handles |
//! | [`input`] | Pointer event model and centroid math |
//! | [`geometry`] | Points, sizes, rotation and corner classification |
//! | [`snapshot`] | Versioned JSON snapshot of the collection |
//! | [`config`] | Engine configuration |
//! | [`error`] | Error type |
//! | [`consts`] | Shared numeric constants (slop, zoom limits, handle size, etc.) |

pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod hit;
pub mod input;
pub mod snapshot;
pub mod state;
pub mod transform;
pub mod viewport;

pub use config::TouchConfig;
pub use engine::{Action, EngineCore};
pub use error::TouchError;
