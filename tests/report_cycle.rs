//! End-to-end tests for the daily report cycle.
//!
//! A recording channel stands in for Telegram so the tests can inspect
//! what was posted to the group, make delivery fail, or hold a delivery
//! in flight while more submissions arrive.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};
use tokio::time::timeout;

use branch_report_bot::bot::{ReportBot, run};
use branch_report_bot::channels::{
    Channel, ChatKind, IncomingMessage, MessageStream, OutgoingResponse,
};
use branch_report_bot::error::{ChannelError, Error, ReportError};
use branch_report_bot::messages;
use branch_report_bot::report::{EmployeeRecord, PublishOutcome, ReportService};

/// Maximum time any test is allowed to wait before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

const GROUP: &str = "-100777";

/// Channel that records group posts instead of sending them.
#[derive(Default)]
struct RecordingChannel {
    sent: Mutex<Vec<(String, String)>>,
    fail: AtomicBool,
    /// When set, `send_to` signals `entered` and waits for `release`.
    hold: Option<(Notify, Notify)>,
    /// Messages streamed by `start`, in order.
    inbox: std::sync::Mutex<Vec<IncomingMessage>>,
}

impl RecordingChannel {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn holding() -> Arc<Self> {
        Arc::new(Self {
            hold: Some((Notify::new(), Notify::new())),
            ..Self::default()
        })
    }

    fn scripted(messages: Vec<IncomingMessage>) -> Arc<Self> {
        Arc::new(Self {
            inbox: std::sync::Mutex::new(messages),
            ..Self::default()
        })
    }

    fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        let messages = match self.inbox.lock() {
            Ok(mut inbox) => std::mem::take(&mut *inbox),
            Err(_) => Vec::new(),
        };
        Ok(Box::pin(futures::stream::iter(messages)))
    }

    async fn respond(
        &self,
        _msg: &IncomingMessage,
        _response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        Ok(())
    }

    async fn send_to(&self, chat_id: &str, content: &str) -> Result<(), ChannelError> {
        if let Some((entered, release)) = &self.hold {
            entered.notify_one();
            release.notified().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ChannelError::SendFailed {
                name: "recording".into(),
                reason: "network down".into(),
            });
        }
        self.sent
            .lock()
            .await
            .push((chat_id.to_string(), content.to_string()));
        Ok(())
    }

    async fn health_check(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}

fn service_with(channel: &Arc<RecordingChannel>) -> Arc<ReportService> {
    Arc::new(ReportService::new(
        Arc::clone(channel) as Arc<dyn Channel>,
        GROUP,
    ))
}

fn private(text: &str) -> IncomingMessage {
    IncomingMessage::new("recording", "42", text)
}

// ── Report service ──────────────────────────────────────────────────

#[tokio::test]
async fn submit_then_publish_resets_cycle() {
    let channel = RecordingChannel::new();
    let service = service_with(&channel);

    let accepted = service
        .submit("Иванов И - 2/30/87\nПетров П - 4/70/100")
        .await
        .unwrap();
    assert_eq!(accepted, 2);

    let outcome = service.publish().await.unwrap();
    assert_eq!(outcome, PublishOutcome::Published { employees: 2 });
    assert!(service.snapshot().await.is_empty());

    let sent = channel.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, GROUP);
    assert_eq!(
        sent[0].1,
        "Иванов И - 50%\nПетров П - 100%\nИТОГ ФИЛИАЛА:\n6/100/94\n75.0%"
    );

    // Nothing new came in: the next publish is the "no report" notice.
    let outcome = service.publish().await.unwrap();
    assert_eq!(outcome, PublishOutcome::NoReport);
    assert_eq!(channel.sent().await[1].1, messages::NO_REPORT);
}

#[tokio::test]
async fn empty_publish_sends_notice_and_stays_empty() {
    let channel = RecordingChannel::new();
    let service = service_with(&channel);

    assert_eq!(service.publish().await.unwrap(), PublishOutcome::NoReport);
    assert_eq!(service.publish().await.unwrap(), PublishOutcome::NoReport);
    assert!(service.snapshot().await.is_empty());

    let sent = channel.sent().await;
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|(_, text)| text == messages::NO_REPORT));
}

#[tokio::test]
async fn rejected_submission_stores_nothing() {
    let channel = RecordingChannel::new();
    let service = service_with(&channel);

    let result = service
        .submit("Иванов И - 2/45/87\nПетров П 4/70/100")
        .await;
    assert_eq!(result, Err(ReportError::Format));
    assert!(service.snapshot().await.is_empty());
}

#[tokio::test]
async fn resubmission_replaces_previous_figures() {
    let channel = RecordingChannel::new();
    let service = service_with(&channel);

    service.submit("Иванов И - 2/45/87").await.unwrap();
    service.submit("Петров П - 1/1/1").await.unwrap();
    service.submit("Иванов И - 0/10/20").await.unwrap();

    assert_eq!(
        service.snapshot().await,
        vec![
            EmployeeRecord::new("Иванов И", 0, 10, 20),
            EmployeeRecord::new("Петров П", 1, 1, 1),
        ]
    );
}

#[tokio::test]
async fn failed_delivery_keeps_reports_for_retry() {
    let channel = RecordingChannel::new();
    let service = service_with(&channel);
    service.submit("Иванов И - 4/60/100").await.unwrap();

    channel.set_failing(true);
    let err = service.publish().await.unwrap_err();
    assert!(matches!(err, Error::Channel(ChannelError::SendFailed { .. })));
    assert_eq!(service.snapshot().await.len(), 1);

    channel.set_failing(false);
    let outcome = service.publish().await.unwrap();
    assert_eq!(outcome, PublishOutcome::Published { employees: 1 });
    assert!(service.snapshot().await.is_empty());
    assert_eq!(channel.sent().await.len(), 1);
}

#[tokio::test]
async fn concurrent_publishes_do_not_duplicate_summary() {
    let channel = RecordingChannel::new();
    let service = service_with(&channel);
    service.submit("Иванов И - 2/30/87").await.unwrap();

    let (a, b) = tokio::join!(service.publish(), service.publish());
    let mut outcomes = vec![a.unwrap(), b.unwrap()];
    outcomes.sort_by_key(|o| matches!(o, PublishOutcome::NoReport));
    assert_eq!(
        outcomes,
        vec![
            PublishOutcome::Published { employees: 1 },
            PublishOutcome::NoReport
        ]
    );

    let sent = channel.sent().await;
    let summaries = sent
        .iter()
        .filter(|(_, text)| text.contains("ИТОГ ФИЛИАЛА:"))
        .count();
    assert_eq!(summaries, 1);
}

#[tokio::test]
async fn submission_during_delivery_is_not_lost() {
    let channel = RecordingChannel::holding();
    let service = service_with(&channel);
    service
        .submit("Иванов И - 2/30/87\nПетров П - 1/1/1")
        .await
        .unwrap();

    let publish = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.publish().await }
    });

    let (entered, release) = channel.hold.as_ref().unwrap();
    timeout(TEST_TIMEOUT, entered.notified()).await.unwrap();

    // Store is not locked while the summary is in flight.
    timeout(
        TEST_TIMEOUT,
        service.submit("Сидоров С - 4/60/100\nПетров П - 2/2/2"),
    )
    .await
    .unwrap()
    .unwrap();
    release.notify_one();

    let outcome = timeout(TEST_TIMEOUT, publish)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(outcome, PublishOutcome::Published { employees: 2 });

    assert_eq!(
        service.snapshot().await,
        vec![
            EmployeeRecord::new("Петров П", 2, 2, 2),
            EmployeeRecord::new("Сидоров С", 4, 60, 100),
        ]
    );
}

// ── Bot routing ─────────────────────────────────────────────────────

#[tokio::test]
async fn private_submission_is_acknowledged() {
    let channel = RecordingChannel::new();
    let bot = ReportBot::new(service_with(&channel), "18:30");

    let reply = bot.handle(&private("Иванов И - 2/45/87")).await.unwrap();
    assert_eq!(reply, messages::with_time(messages::SAVED, "18:30"));
    assert_eq!(bot.service().snapshot().await.len(), 1);

    let reply = bot.handle(&private("Иванов И. - 2/45/87")).await.unwrap();
    assert_eq!(reply, messages::FORMAT_INVALID);
    assert_eq!(
        bot.service().snapshot().await[0],
        EmployeeRecord::new("Иванов И", 2, 45, 87)
    );
}

#[tokio::test]
async fn group_text_is_ignored() {
    let channel = RecordingChannel::new();
    let bot = ReportBot::new(service_with(&channel), "18:30");

    let msg = private("Иванов И - 2/45/87").in_chat(GROUP, ChatKind::Group);
    assert!(bot.handle(&msg).await.is_none());
    assert!(bot.service().snapshot().await.is_empty());
}

#[tokio::test]
async fn chatid_and_start_work_in_any_chat() {
    let channel = RecordingChannel::new();
    let bot = ReportBot::new(service_with(&channel), "18:30");

    let msg = private("/chatid").in_chat(GROUP, ChatKind::Supergroup);
    assert_eq!(bot.handle(&msg).await.unwrap(), messages::chat_id(GROUP));

    let greeting = bot.handle(&private("/start")).await.unwrap();
    assert!(greeting.contains("Иванов И - 2/45/87"));
    assert!(greeting.contains("18:30"));
}

#[tokio::test]
async fn manual_report_publishes_to_group() {
    let channel = RecordingChannel::new();
    let bot = ReportBot::new(service_with(&channel), "18:30");
    bot.handle(&private("Иванов И - 4/60/100")).await.unwrap();

    let reply = bot.handle(&private("/отчет")).await.unwrap();
    assert_eq!(reply, messages::REPORT_SENT);

    let sent = channel.sent().await;
    assert_eq!(
        sent,
        vec![(
            GROUP.to_string(),
            "Иванов И - 100%\nИТОГ ФИЛИАЛА:\n4/60/100\n100.0%".to_string()
        )]
    );
    assert!(bot.service().snapshot().await.is_empty());
}

#[tokio::test]
async fn manual_report_reports_delivery_failure() {
    let channel = RecordingChannel::new();
    let bot = ReportBot::new(service_with(&channel), "18:30");
    bot.handle(&private("Иванов И - 4/60/100")).await.unwrap();

    channel.set_failing(true);
    let reply = bot.handle(&private("/report")).await.unwrap();
    assert_eq!(reply, messages::REPORT_FAILED);
    assert_eq!(bot.service().snapshot().await.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn run_applies_submissions_in_arrival_order() {
    for _ in 0..200 {
        let channel = RecordingChannel::scripted(vec![
            private("Иванов И - 1/1/1"),
            private("Иванов И - 2/2/2"),
        ]);
        let service = service_with(&channel);
        let bot = Arc::new(ReportBot::new(Arc::clone(&service), "18:30"));

        timeout(
            TEST_TIMEOUT,
            run(Arc::clone(&channel) as Arc<dyn Channel>, bot),
        )
        .await
        .expect("run hung")
        .unwrap();

        assert_eq!(
            service.snapshot().await,
            vec![EmployeeRecord::new("Иванов И", 2, 2, 2)]
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn run_keeps_last_of_many_corrections() {
    let messages = (1..=20)
        .map(|n| private(&format!("Петров П - {n}/{n}/{n}")))
        .collect();
    let channel = RecordingChannel::scripted(messages);
    let service = service_with(&channel);
    let bot = Arc::new(ReportBot::new(Arc::clone(&service), "18:30"));

    timeout(
        TEST_TIMEOUT,
        run(Arc::clone(&channel) as Arc<dyn Channel>, bot),
    )
    .await
    .expect("run hung")
    .unwrap();

    assert_eq!(
        service.snapshot().await,
        vec![EmployeeRecord::new("Петров П", 20, 20, 20)]
    );
}
