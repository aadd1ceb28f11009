pub mod payload;
pub mod status;

pub use payload::{
    select_payload, AttitudeSample, PayloadKind, PayloadSample, Selection, TemperatureSample,
    ADS_SENSORS, TEMP_SENSORS,
};
pub use status::StatusSnapshot;
