//! Request handlers for attendance and the student roster
//!
//! Each handler is a stateless translation from a method-tagged request to
//! storage calls and back to a JSON response with CORS headers. The two
//! handlers are independent of each other and share only the storage seam.

pub mod attendance;
pub mod gateway;
pub mod headers;
pub mod request;
pub mod students;

pub use attendance::AttendanceService;
pub use gateway::{invoke, GatewayEvent, GatewayResponse};
pub use request::{Acknowledgement, ErrorBody, RequestHandler, ServiceRequest, ServiceResponse};
pub use students::StudentService;
