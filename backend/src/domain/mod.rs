//! Domain primitives, services and ports for parcel tracking.
//!
//! Purpose: resolve a tracking code into a normalised [`TrackingRecord`] by
//! negotiating a browser-like session with the upstream tracking service,
//! fetching its tracking payload and translating event statuses. Adapters
//! plug in through the traits in [`ports`]; nothing here performs I/O
//! directly.
//!
//! Public surface:
//! - [`TrackingService`] implements the [`ports::TrackingQuery`] driving port.
//! - [`SessionNegotiator`] runs the CSRF token and cookie state machine.
//! - [`TrackingResolver`] turns a session into a [`TrackingRecord`].
//! - [`TrackingError`] carries failures with a stable [`ErrorCode`].

pub mod cookie_jar;
pub mod csrf;
pub mod error;
pub mod ports;
pub mod resolver;
pub mod session;
pub mod tracking_code;
pub mod tracking_record;
pub mod tracking_service;

pub use self::cookie_jar::{CookieJar, REQUIRED_SESSION_COOKIES, parse_set_cookies};
pub use self::csrf::{CSRF_HEADER, CsrfToken};
pub use self::error::{ErrorCode, MISSING_TRACKING_CODE_MESSAGE, TrackingError};
pub use self::resolver::{LocalizationMap, TrackingResolver};
pub use self::session::{NegotiationPolicy, NegotiationState, Session, SessionNegotiator};
pub use self::tracking_code::{TrackingCode, TrackingCodeValidationError};
pub use self::tracking_record::{HistoryEvent, TrackingRecord, TrackingSummary};
pub use self::tracking_service::{TrackingService, TrackingServiceConfig};
