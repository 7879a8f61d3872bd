use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use super::{ImageCache, DEFAULT_ARTWORK_BASE, DEFAULT_BASE_URL};
use crate::models::{display_name, Creature};
use crate::{Error, Result};

/// Anything that can resolve a creature id into a record.
#[async_trait]
pub trait CreatureSource: Send + Sync {
    /// Fetch a single creature by numeric id
    async fn fetch_creature(&self, id: u32) -> Result<Creature>;

    /// Start downloading the creature's artwork in the background.
    /// Never reports failure.
    fn warm_image(&self, creature: &Creature);
}

/// Where to find creature records and artwork
#[derive(Debug, Clone, PartialEq)]
pub struct ApiEndpoints {
    pub base_url: String,
    pub artwork_base: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            artwork_base: DEFAULT_ARTWORK_BASE.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ApiCreature {
    id: u32,
    name: String,
    #[serde(default)]
    types: Vec<ApiTypeSlot>,
}

#[derive(Deserialize)]
struct ApiTypeSlot {
    #[serde(default)]
    slot: u32,
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Deserialize)]
struct NamedResource {
    name: String,
}

/// Decode a creature JSON document and derive its artwork URL
pub fn parse_creature(json: &str, artwork_base: &str) -> Result<Creature> {
    let mut raw: ApiCreature = serde_json::from_str(json)?;
    raw.types.sort_by_key(|t| t.slot);
    let types = raw.types.into_iter().map(|t| t.kind.name).collect();
    Ok(Creature::new(raw.id, display_name(&raw.name), types, artwork_base))
}

/// HTTP client for the PokeAPI creature endpoint
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    http: reqwest::Client,
    endpoints: ApiEndpoints,
    images: ImageCache,
}

impl PokeApiClient {
    pub fn new(endpoints: ApiEndpoints, images: ImageCache) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("swipedex/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoints,
            images,
        })
    }

    pub fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    fn creature_url(&self, id: u32) -> String {
        format!("{}/{}", self.endpoints.base_url.trim_end_matches('/'), id)
    }
}

async fn download(http: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let response = http.get(url).send().await?;
    if !response.status().is_success() {
        return Err(Error::Api(format!(
            "HTTP {} while fetching {}",
            response.status(),
            url
        )));
    }
    Ok(response.bytes().await?.to_vec())
}

#[async_trait]
impl CreatureSource for PokeApiClient {
    async fn fetch_creature(&self, id: u32) -> Result<Creature> {
        let url = self.creature_url(id);
        debug!("fetching creature {} from {}", id, url);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "HTTP {} while fetching creature {}",
                response.status(),
                id
            )));
        }

        let text = response.text().await?;
        parse_creature(&text, &self.endpoints.artwork_base)
    }

    fn warm_image(&self, creature: &Creature) {
        if self.images.contains(&creature.image_url) {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("no runtime available, skipping artwork warm-up for {}", creature.id);
            return;
        };

        let http = self.http.clone();
        let images = self.images.clone();
        let url = creature.image_url.clone();
        runtime.spawn(async move {
            match download(&http, &url).await {
                Ok(bytes) => images.insert(url, bytes),
                Err(e) => debug!("artwork warm-up failed for {}: {}", url, e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const PIKACHU: &str = r#"{
        "id": 25,
        "name": "pikachu",
        "height": 4,
        "types": [
            { "slot": 1, "type": { "name": "electric", "url": "https://pokeapi.co/api/v2/type/13/" } }
        ]
    }"#;

    #[test]
    fn test_parse_creature() {
        let creature = parse_creature(PIKACHU, "https://img.example/artwork").unwrap();
        assert_eq!(creature.id, 25);
        assert_eq!(creature.name, "Pikachu");
        assert_eq!(creature.types, vec!["electric".to_string()]);
        assert_eq!(creature.image_url, "https://img.example/artwork/25.png");
    }

    #[test]
    fn test_parse_orders_types_by_slot() {
        let json = r#"{"id":6,"name":"charizard","types":[
            {"slot":2,"type":{"name":"flying"}},
            {"slot":1,"type":{"name":"fire"}}
        ]}"#;
        let creature = parse_creature(json, "https://img").unwrap();
        assert_eq!(creature.types, vec!["fire".to_string(), "flying".to_string()]);
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let result = parse_creature(r#"{"name":"missingno"}"#, "https://img");
        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[test]
    fn test_creature_url() {
        let client = PokeApiClient::new(
            ApiEndpoints {
                base_url: "https://api.example/pokemon/".to_string(),
                artwork_base: "https://img".to_string(),
            },
            ImageCache::new(),
        )
        .unwrap();
        assert_eq!(client.creature_url(151), "https://api.example/pokemon/151");
    }

    #[test]
    fn test_warm_image_without_runtime_is_a_no_op() {
        let images = ImageCache::new();
        let client = PokeApiClient::new(ApiEndpoints::default(), images.clone()).unwrap();
        let creature = Creature::new(25, "Pikachu", vec![], "https://img");
        client.warm_image(&creature);
        assert!(images.is_empty());
    }

    struct Canned {
        status: &'static str,
        content_type: &'static str,
        body: Vec<u8>,
    }

    struct LocalServer {
        base_url: String,
        hits: Arc<AtomicUsize>,
        request_lines: Arc<Mutex<Vec<String>>>,
    }

    /// Answer every connection on a local port with the same response
    async fn serve(canned: Canned) -> LocalServer {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let request_lines = Arc::new(Mutex::new(Vec::new()));

        let counter = Arc::clone(&hits);
        let lines = Arc::clone(&request_lines);
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                    if request.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                if let Some(line) = String::from_utf8_lossy(&request).lines().next() {
                    lines.lock().unwrap().push(line.to_string());
                }

                let head = format!(
                    "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    canned.status,
                    canned.content_type,
                    canned.body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&canned.body).await;
                let _ = socket.shutdown().await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        LocalServer {
            base_url: format!("http://{}", addr),
            hits,
            request_lines,
        }
    }

    fn local_client(server: &LocalServer, images: ImageCache) -> PokeApiClient {
        PokeApiClient::new(
            ApiEndpoints {
                base_url: format!("{}/pokemon", server.base_url),
                artwork_base: format!("{}/artwork", server.base_url),
            },
            images,
        )
        .unwrap()
    }

    async fn wait_for_hits(server: &LocalServer, count: usize) {
        for _ in 0..200 {
            if server.hits.load(Ordering::SeqCst) >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("server never saw {} requests", count);
    }

    #[tokio::test]
    async fn test_fetch_creature_over_http() {
        let server = serve(Canned {
            status: "200 OK",
            content_type: "application/json",
            body: PIKACHU.as_bytes().to_vec(),
        })
        .await;
        let client = local_client(&server, ImageCache::new());

        let creature = client.fetch_creature(25).await.unwrap();

        assert_eq!(creature.id, 25);
        assert_eq!(creature.name, "Pikachu");
        assert_eq!(creature.image_url, format!("{}/artwork/25.png", server.base_url));
        let lines = server.request_lines.lock().unwrap().clone();
        assert_eq!(lines, vec!["GET /pokemon/25 HTTP/1.1".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_creature_not_found_is_api_error() {
        let server = serve(Canned {
            status: "404 Not Found",
            content_type: "text/plain",
            body: b"Not Found".to_vec(),
        })
        .await;
        let images = ImageCache::new();
        let client = local_client(&server, images.clone());

        let result = client.fetch_creature(99999).await;

        match result {
            Err(Error::Api(message)) => assert!(message.contains("404")),
            other => panic!("expected an API error, got {:?}", other),
        }
        assert!(images.is_empty());
    }

    #[tokio::test]
    async fn test_warm_image_downloads_artwork() {
        let png = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];
        let server = serve(Canned {
            status: "200 OK",
            content_type: "image/png",
            body: png.clone(),
        })
        .await;
        let images = ImageCache::new();
        let client = local_client(&server, images.clone());
        let creature = Creature::new(25, "Pikachu", vec![], &format!("{}/artwork", server.base_url));

        client.warm_image(&creature);

        let mut cached = None;
        for _ in 0..200 {
            cached = images.get(&creature.image_url);
            if cached.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(cached.map(|bytes| bytes.to_vec()), Some(png));
    }

    #[tokio::test]
    async fn test_warm_image_swallows_failed_download() {
        let server = serve(Canned {
            status: "404 Not Found",
            content_type: "text/plain",
            body: b"Not Found".to_vec(),
        })
        .await;
        let images = ImageCache::new();
        let client = local_client(&server, images.clone());
        let creature = Creature::new(25, "Pikachu", vec![], &format!("{}/artwork", server.base_url));

        client.warm_image(&creature);
        wait_for_hits(&server, 1).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(images.is_empty());
        assert!(!images.contains(&creature.image_url));
    }
}
