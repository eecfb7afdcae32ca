//! Training-data extraction
//!
//! One fixed aggregation query: recognition events grouped by type and
//! calendar bucket, counted, filtered to the monetary/badge value codes and
//! executed status. The connection is scoped to the call and released on
//! every exit path. Failures are fatal; there is no retry here.

use sqlx::{Connection, PgConnection};
use tracing::info;

use crate::error::Result;
use super::observation::DemandObservation;

/// Aggregation over executed recognition events. All seven columns are cast
/// to double precision so row mapping stays uniform f64.
const TRAINING_DATA_QUERY: &str = r#"
SELECT CAST(ur.recognition_type_id AS DOUBLE PRECISION)          AS id,
       CAST(EXTRACT(YEAR    FROM ur.created_at) AS DOUBLE PRECISION) AS year,
       CAST(EXTRACT(MONTH   FROM ur.created_at) AS DOUBLE PRECISION) AS month,
       CAST(EXTRACT(DAY     FROM ur.created_at) AS DOUBLE PRECISION) AS day,
       CAST(EXTRACT(HOUR    FROM ur.created_at) AS DOUBLE PRECISION) AS hour,
       CAST(EXTRACT(ISODOW  FROM ur.created_at) AS DOUBLE PRECISION) AS weekday,
       CAST(COUNT(ur.recognition_type_id) AS DOUBLE PRECISION)       AS count
FROM user_recognition AS ur
JOIN recognition_type AS rt
  ON rt.recognition_type_id = ur.recognition_type_id
WHERE rt.recognition_value_code IN ('M', 'B')
  AND ur.user_recognition_status_code = 'Executed'
GROUP BY ur.recognition_type_id,
         EXTRACT(YEAR   FROM ur.created_at),
         EXTRACT(MONTH  FROM ur.created_at),
         EXTRACT(DAY    FROM ur.created_at),
         EXTRACT(HOUR   FROM ur.created_at),
         EXTRACT(ISODOW FROM ur.created_at)
ORDER BY day, month, year DESC
"#;

/// Fetch the full training set. Zero matching rows is a valid, empty result;
/// connect and query failures propagate.
pub async fn fetch_training_data(connection_string: &str) -> Result<Vec<DemandObservation>> {
    let mut conn = PgConnection::connect(connection_string).await?;

    let rows = sqlx::query_as::<_, DemandObservation>(TRAINING_DATA_QUERY)
        .fetch_all(&mut conn)
        .await?;

    conn.close().await?;

    info!(rows = rows.len(), "training data extracted");
    Ok(rows)
}
