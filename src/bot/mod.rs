//! Telegram collaborator: subscriber registration over long-poll and the
//! fixed-interval market broadcast.

pub mod format;
pub mod member_store;
pub mod telegram;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::engine::MarketEngine;
use member_store::MemberStore;
use telegram::TelegramClient;

const WELCOME_TEXT: &str = "*RIYALBOT AKTIF!*\nUpdate otomatis tiap 3 menit.";
const LISTEN_RETRY_SECS: u64 = 5;

/// Long-poll `getUpdates` and register every chat that sends `/start`.
/// Runs until the process exits; transient errors back off and retry.
pub async fn run_update_listener(tg: TelegramClient, store: Arc<MemberStore>) {
    let mut last_update_id = 0_i64;

    loop {
        let updates = match tg.get_updates(last_update_id).await {
            Ok(u) => u,
            Err(e) => {
                warn!(error = %e, "telegram update poll failed");
                tokio::time::sleep(Duration::from_secs(LISTEN_RETRY_SECS)).await;
                continue;
            }
        };

        for update in updates {
            last_update_id = last_update_id.max(update.update_id);
            let Some(message) = update.message else {
                continue;
            };
            if message.text.as_deref() != Some("/start") {
                continue;
            }

            let chat_id = message.chat.id;
            match store.add_member(chat_id) {
                Ok(_) => {
                    if let Err(e) = tg.send_message(chat_id, WELCOME_TEXT).await {
                        warn!(chat_id, error = %e, "welcome message failed");
                    }
                }
                Err(e) => warn!(chat_id, error = %e, "member registration failed"),
            }
        }
    }
}

/// Every interval tick: build one snapshot, render it once, deliver to
/// all members plus the admin. Per-chat failures are logged and skipped.
pub async fn run_broadcast_loop(
    engine: Arc<MarketEngine>,
    tg: TelegramClient,
    store: Arc<MemberStore>,
    admin_chat_id: Option<i64>,
) {
    let interval_secs = engine.config().broadcast_interval_secs;
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        ticker.tick().await;

        let snapshot = engine.build_snapshot().await;
        let report = format::render_report(&snapshot);

        let mut recipients: BTreeSet<i64> = match store.members() {
            Ok(m) => m.into_iter().collect(),
            Err(e) => {
                warn!(error = %e, "member list unavailable, broadcasting to admin only");
                BTreeSet::new()
            }
        };
        if let Some(admin) = admin_chat_id {
            recipients.insert(admin);
        }

        let mut delivered = 0_usize;
        for chat_id in &recipients {
            match tg.send_message(*chat_id, &report).await {
                Ok(()) => delivered += 1,
                Err(e) => warn!(chat_id, error = %e, "broadcast delivery failed"),
            }
        }

        info!(
            recipients = recipients.len(),
            delivered, "broadcast cycle finished"
        );
    }
}
