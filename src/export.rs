//! Export of summary statistics as CSV

use crate::result::Share;
use csv_async::AsyncWriterBuilder;
use serde::Serialize;
use tokio::io::AsyncWrite;

/// Row of the exported CSV file
#[derive(Serialize)]
struct Row<'share> {
    name: &'share str,
    percent: Option<f64>,
}

/// Write shares as a `name,percent` CSV table
///
/// Shares with no percentage (zero denominator) get an empty percent field.
pub async fn write_csv<W: AsyncWrite + Unpin>(
    output: W,
    shares: &[Share],
) -> csv_async::Result<()> {
    let mut serializer = AsyncWriterBuilder::new()
        .has_headers(true)
        .create_serializer(output);
    for share in shares {
        serializer
            .serialize(Row {
                name: &share.name,
                percent: share.percent,
            })
            .await?;
    }
    serializer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::CountedGroup;

    #[tokio::test]
    async fn csv_has_header_and_rows() {
        let shares = [
            Share::new(&CountedGroup::new("ai", 5), 8),
            Share::new(&CountedGroup::new("policy, law", 3), 0),
        ];
        let mut output = Vec::new();
        write_csv(&mut output, &shares).await.unwrap();
        let output = String::from_utf8(output).unwrap();
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines, ["name,percent", "ai,62.5", "\"policy, law\","]);
    }
}
