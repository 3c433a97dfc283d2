//! 扫码计数实时推送（Server-Sent Events）
//!
//! 每个连接拥有一个后台会话；连接断开时流被丢弃，会话随之拆除并释放订阅。

use std::time::Duration;

use actix_web::web::Bytes;
use actix_web::{HttpResponse, web};
use futures_util::stream;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::{debug, warn};

use crate::dashboard::{CounterUpdate, DashboardController, DashboardSession};

use super::helpers::error_from_qrlink;

/// SSE 保活间隔
#[derive(Debug, Clone, Copy)]
pub struct KeepAlive(pub Duration);

struct SseState {
    // 持有会话，流结束时一并 drop
    session: DashboardSession,
    updates: mpsc::Receiver<CounterUpdate>,
    keepalive: Interval,
    opened: bool,
}

fn scan_frame(update: &CounterUpdate) -> Bytes {
    let data = serde_json::to_string(update).unwrap_or_else(|_| "{}".to_string());
    Bytes::from(format!("event: scan\ndata: {}\n\n", data))
}

fn hello_frame(session: &DashboardSession) -> Bytes {
    Bytes::from(format!(
        "event: ready\ndata: {{\"session\":\"{}\",\"rows\":{}}}\n\n",
        session.id(),
        session.row_count()
    ))
}

enum Wake {
    Update(Option<CounterUpdate>),
    KeepAlive,
}

const KEEPALIVE_FRAME: &[u8] = b": keep-alive\n\n";

pub async fn scan_stream(
    controller: web::Data<DashboardController>,
    keepalive: web::Data<KeepAlive>,
) -> HttpResponse {
    let (session, updates) = match controller.open_session().await {
        Ok(opened) => opened,
        Err(e) => {
            warn!("Failed to open dashboard session: {}", e);
            return error_from_qrlink(&e);
        }
    };

    let mut ticker = interval(keepalive.0);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.reset();

    let state = SseState {
        session,
        updates,
        keepalive: ticker,
        opened: false,
    };

    let body = stream::unfold(state, |mut state| async move {
        if !state.opened {
            state.opened = true;
            let frame = hello_frame(&state.session);
            return Some((Ok::<_, actix_web::Error>(frame), state));
        }

        let next = tokio::select! {
            update = state.updates.recv() => Wake::Update(update),
            _ = state.keepalive.tick() => Wake::KeepAlive,
        };

        match next {
            Wake::Update(Some(update)) => Some((Ok(scan_frame(&update)), state)),
            Wake::Update(None) => {
                debug!("Dashboard session {} update channel closed", state.session.id());
                None
            }
            Wake::KeepAlive => Some((Ok(Bytes::from_static(KEEPALIVE_FRAME)), state)),
        }
    });

    HttpResponse::Ok()
        .insert_header(("Content-Type", "text/event-stream"))
        .insert_header(("Cache-Control", "no-cache"))
        .insert_header(("X-Accel-Buffering", "no"))
        // 跳过 Compress 中间件，事件需要逐帧到达
        .insert_header(("Content-Encoding", "identity"))
        .streaming(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_frame_format() {
        let frame = scan_frame(&CounterUpdate { link_id: 3, count: 12 });
        assert_eq!(
            frame,
            Bytes::from_static(b"event: scan\ndata: {\"link_id\":3,\"count\":12}\n\n")
        );
    }
}
