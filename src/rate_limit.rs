use std::{collections::HashMap, net::IpAddr, time::Duration};

use tokio::{sync::Mutex, time::Instant};

struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter per client address.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clients: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        RateLimiter {
            max_requests,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub async fn check(&self, client: IpAddr) -> bool {
        self.check_at(client, Instant::now()).await
    }

    pub async fn check_at(&self, client: IpAddr, now: Instant) -> bool {
        let mut clients = self.clients.lock().await;
        clients.retain(|_, w| now.duration_since(w.started) < self.window);

        let window = clients.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });
        if window.count >= self.max_requests {
            return false;
        }
        window.count += 1;
        true
    }
}
