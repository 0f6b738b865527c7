use crate::error::{Error, EstimatorResult};
use error_stack::ResultExt;
use std::time::{SystemTime, UNIX_EPOCH};

pub mod fee;
pub mod limit_amount;
pub mod number_conversion;
pub mod uint;

pub fn get_timestamp_millis() -> EstimatorResult<u64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .change_context(Error::Unknown)
        .attach_printable("System clock is before the epoch")?;
    u64::try_from(elapsed.as_millis())
        .change_context(Error::Unknown)
        .attach_printable("Timestamp does not fit in u64")
}
