//! # OpenNMS DAO
//!
//! Version-aware data access for the OpenNMS REST API:
//!
//! ```text
//! Caller
//!   ↓  Filter                    (query intent)
//! EventDao                       (Dao<i64, Event>)
//!   ↓  DaoSupport                (options, counts, coercions, shapes)
//!   ↓  Arc<dyn OnmsHttp>         (transport interface)
//! ReqwestHttp
//!   ↓
//! OpenNMS (rest/ or api/v2/)
//! ```
//!
//! ## Structure
//!
//! ```text
//! src/
//!   filter/
//!     mod.rs        ← Filter, Clause, Comparator, OrderBy
//!     encoder.rs    ← v1 and v2 query encoders
//!   http/
//!     mod.rs        ← OnmsHttp trait, RequestOptions, HttpResponse
//!     reqwest_http.rs
//!   dao/
//!     mod.rs        ← Dao trait
//!     support.rs    ← DaoSupport, Endpoint
//!     event_dao.rs  ← EventDao
//!   coerce.rs       ← total wire-value coercions
//!   shape.rs        ← collection shape normalization
//! ```

pub mod coerce;
pub mod dao;
pub mod filter;
pub mod http;
pub mod shape;

pub use coerce::Coerced;
pub use dao::{Dao, DaoSupport, Endpoint, EventDao};
pub use filter::*;
pub use http::{HttpResponse, OnmsHttp, ReqwestHttp, RequestOptions};
pub use shape::RecordShape;
