use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

const MAX_HEADER_LINES: usize = 100;
const MAX_LINE_BYTES: usize = 8 * 1024;
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, PartialEq, Eq)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
}

impl TryFrom<&str> for Method {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, anyhow::Error> {
        match value {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            _ => Err(anyhow::anyhow!("Method not supported")),
        }
    }
}

#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl Request {
    pub async fn new<Reader>(reader: Reader) -> Result<Self>
    where
        Reader: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(reader);

        // Method and path
        let first = read_line_capped(&mut reader)
            .await
            .context("Headline Error")?;
        let mut request_parts = first.split_whitespace();
        let method: Method = request_parts
            .next()
            .ok_or(anyhow::anyhow!("missing method"))
            .and_then(TryInto::try_into)
            .context("Missing Method")?;
        let target = request_parts.next().context("No Path")?;
        let (path, query) = split_target(target);

        // Headers
        let mut headers = HashMap::new();
        for _ in 0..MAX_HEADER_LINES {
            let line = read_line_capped(&mut reader).await?;
            if line.is_empty() {
                break;
            }
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((k, v)) = line.split_once(':') {
                headers.insert(k.trim().to_lowercase(), v.trim().to_string());
            }
        }

        // Body
        let length = match headers.get("content-length") {
            Some(raw) => raw.parse::<usize>().context("Invalid Content-Length")?,
            None => 0,
        };
        if length > MAX_BODY_BYTES {
            bail!("Body too large: {} bytes", length);
        }
        let mut body = vec![0; length];
        reader.read_exact(&mut body).await.context("Body Error")?;

        Ok(Request {
            method,
            path,
            query,
            headers,
            body: String::from_utf8(body).context("Body is not UTF-8")?,
        })
    }

    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }
}

/// Empty string at EOF. Lines longer than `MAX_LINE_BYTES` are an error.
async fn read_line_capped<R>(reader: &mut R) -> Result<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let read = (&mut *reader)
        .take(MAX_LINE_BYTES as u64)
        .read_line(&mut line)
        .await?;
    if read == MAX_LINE_BYTES && !line.ends_with('\n') {
        bail!("Line exceeds {} bytes", MAX_LINE_BYTES);
    }
    Ok(line)
}

fn split_target(target: &str) -> (String, HashMap<String, String>) {
    let (path, raw_query) = target.split_once('?').unwrap_or((target, ""));
    let query = raw_query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect();
    (path.to_string(), query)
}
