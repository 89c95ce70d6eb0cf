//! Retrieval of the serialized dataset from disk or from the network

use crate::Result;
use anyhow::Context;
use article_stats::progress::{ProgressConfig, ProgressReport, ProgressTracker, Work};
use async_compression::tokio::bufread::GzipDecoder;
use futures::{stream::StreamExt, TryStreamExt};
use reqwest::Response;
use std::io::{self, ErrorKind};
use tokio::{
    fs::File,
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
};
use tokio_util::io::{ReaderStream, StreamReader};

/// Fetch the lines of a serialized dataset
///
/// `source` is either an `http://` or `https://` URL or a local path. Sources
/// whose name ends with `.gz` are decompressed on the fly.
pub async fn fetch_lines(
    source: &str,
    client: &reqwest::Client,
    report: &ProgressReport,
) -> Result<Vec<String>> {
    let gzipped = source.ends_with(".gz");
    let lines = if is_url(source) {
        // Start the download
        let context = || format!("initiating download of {source}");
        let response = client
            .get(source)
            .send()
            .await
            .and_then(Response::error_for_status)
            .with_context(context)?;
        let bytes = track_bytes(report, "Downloading dataset", response.content_length());

        // Slice the download into chunks of bytes
        let stream = response.bytes_stream().map(move |res| {
            res
                // Track how many input bytes have been downloaded so far
                .inspect(|block| {
                    if let Some(bytes) = &bytes {
                        bytes.make_progress(block.len() as u64);
                    }
                })
                // Translate reqwest errors into I/O errors
                .map_err(|e| io::Error::new(ErrorKind::Other, e))
        });
        read_lines(StreamReader::new(Box::pin(stream)), gzipped).await
    } else {
        let file = File::open(source)
            .await
            .with_context(|| format!("opening {source}"))?;
        let len = file.metadata().await.ok().map(|metadata| metadata.len());
        let bytes = track_bytes(report, "Reading dataset", len);
        let stream = ReaderStream::new(file).inspect_ok(move |block| {
            if let Some(bytes) = &bytes {
                bytes.make_progress(block.len() as u64);
            }
        });
        read_lines(StreamReader::new(stream), gzipped).await
    };
    let lines = lines.with_context(|| format!("reading dataset from {source}"))?;
    log::info!("Read {} lines from {source}", lines.len());
    Ok(lines)
}

/// Truth that a dataset source should be downloaded
fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Track progress through a byte stream, if its length is known
fn track_bytes(
    report: &ProgressReport,
    what: &'static str,
    len: Option<u64>,
) -> Option<ProgressTracker> {
    len.filter(|&len| len > 0)
        .map(|len| report.add(what, ProgressConfig::new(Work::Bytes(len))))
}

/// Split a byte stream into lines, decompressing it first if needed
async fn read_lines(reader: impl AsyncBufRead + Unpin, gzipped: bool) -> io::Result<Vec<String>> {
    if gzipped {
        collect_lines(BufReader::new(GzipDecoder::new(reader))).await
    } else {
        collect_lines(reader).await
    }
}

/// Collect the lines of a text stream
async fn collect_lines(reader: impl AsyncBufRead + Unpin) -> io::Result<Vec<String>> {
    let mut lines = reader.lines();
    let mut result = Vec::new();
    while let Some(line) = lines.next_line().await? {
        result.push(line);
    }
    Ok(result)
}
