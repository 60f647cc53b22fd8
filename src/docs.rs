use crate::api::attendance::{HistoryListResponse, HistoryQuery};
use crate::api::location::CreateLocation;
use crate::api::profile::UpdateProfile;
use crate::api::scan::ScanReq;
use crate::api::visitor::{CreateVisitor, UpdateVisitorStatus, VisitorListResponse, VisitorQuery};
use crate::model::attendance::Attendance;
use crate::model::location::Location;
use crate::model::profile::Profile;
use crate::model::visitor::Visitor;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Scanpoint API",
        version = "1.0.0",
        description = r#"
## QR Attendance Service

This API powers a QR-code attendance system: users scan a location's code
to check in or out, and the service records the event and keeps each
user's status current.

### Key Features
- **Scan ingestion**
  - One endpoint classifies each scan as a check-in or check-out and records it
- **Attendance history**
  - Paginated per-user event log, filterable by kind
- **Profiles**
  - Self-service profile with last check-in/out and monthly summary
- **Visitor records**
  - Front-desk scheduling and status tracking
- **Location registry**
  - Admin-registered scan points; the registered id is what the QR code encodes

### Security
Protected endpoints use **JWT Bearer authentication** with refresh-token
rotation.

### Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    modifiers(&SecurityAddon),
    paths(
        crate::api::scan::scan,

        crate::api::attendance::history,

        crate::api::profile::get_profile,
        crate::api::profile::update_profile,

        crate::api::visitor::list_visitors,
        crate::api::visitor::create_visitor,
        crate::api::visitor::update_visitor_status,

        crate::api::location::create_location,
        crate::api::location::list_locations
    ),
    components(
        schemas(
            ScanReq,
            HistoryQuery,
            HistoryListResponse,
            Attendance,
            Profile,
            UpdateProfile,
            Visitor,
            VisitorQuery,
            VisitorListResponse,
            CreateVisitor,
            UpdateVisitorStatus,
            Location,
            CreateLocation
        )
    ),
    tags(
        (name = "Scan", description = "Scan ingestion API"),
        (name = "Attendance", description = "Attendance history APIs"),
        (name = "Profile", description = "Profile APIs"),
        (name = "Visitors", description = "Visitor record APIs"),
        (name = "Locations", description = "Location registry APIs"),
    )
)]
pub struct ApiDoc;
