use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use registration_form::error::ApiError;
use registration_form::services::draft_store::{DraftSnapshot, DRAFT_KEY, SUBMITTED_KEY};
use registration_form::services::field_validator::EMAIL_MESSAGE;
use registration_form::workflow::GENERIC_FAILURE_MESSAGE;
use registration_form::{
    App, Config, DeliveryReceipt, EmailDelivery, FormDefinition, MemorySessionStorage,
    RecordingView, SessionStorage, SubmissionPayload, SubmitOutcome,
};
use tokio::io::{AsyncWriteExt, BufReader};

/// 记录发送内容的假投递服务
#[derive(Default)]
struct FakeDelivery {
    fail: bool,
    sent: Mutex<Vec<(String, String, SubmissionPayload)>>,
}

impl FakeDelivery {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn sent(&self) -> Vec<(String, String, SubmissionPayload)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailDelivery for FakeDelivery {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        payload: &SubmissionPayload,
    ) -> Result<DeliveryReceipt, ApiError> {
        self.sent.lock().unwrap().push((
            service_id.to_string(),
            template_id.to_string(),
            payload.clone(),
        ));
        if self.fail {
            Err(ApiError::BadResponse {
                endpoint: "api/v1.0/email/send".to_string(),
                status: 503,
                message: None,
            })
        } else {
            Ok(DeliveryReceipt {
                status: 200,
                text: "OK".to_string(),
            })
        }
    }
}

struct Harness {
    app: App,
    view: RecordingView,
    storage: MemorySessionStorage,
    delivery: Arc<FakeDelivery>,
}

fn create_harness(delivery: FakeDelivery, storage: MemorySessionStorage) -> Harness {
    let view = RecordingView::new();
    let delivery = Arc::new(delivery);
    let registry = FormDefinition::registration().build_registry().unwrap();

    let app = App::with_parts(
        Config::default(),
        registry,
        Box::new(view.clone()),
        Arc::new(storage.clone()),
        delivery.clone(),
    );

    Harness {
        app,
        view,
        storage,
        delivery,
    }
}

const VALID_INPUT: &str = "\
title=Mr
fullName=Eric Habimana
email=a@b.com
phone=123-456-7890
house=4
street=KG 11 Ave
town=Musanze
gender=Male
dob=2000-01-01
purpose=Peer support
receivedServices=No
";

fn saved_draft(storage: &MemorySessionStorage) -> DraftSnapshot {
    serde_json::from_str(&storage.get(DRAFT_KEY).expect("草稿不存在")).unwrap()
}

#[tokio::test]
async fn test_valid_form_is_submitted() {
    let mut h = create_harness(FakeDelivery::default(), MemorySessionStorage::new());
    let input = format!("{}:submit\nemail=ignored@after.submit\n", VALID_INPUT);

    let summary = h.app.run(input.as_bytes()).await.unwrap();

    assert!(summary.submitted());
    assert_eq!(summary.inputs, 11);
    assert_eq!(summary.submits, 1);

    let sent = h.delivery.sent();
    assert_eq!(sent.len(), 1);
    let (service, template, payload) = &sent[0];
    assert_eq!(service, "service_0dt6vc8");
    assert_eq!(template, "template_ofp7pqv");
    assert_eq!(payload.address, "4, KG 11 Ave, Musanze");
    assert_eq!(payload.email, "a@b.com");
    assert_eq!(payload.received_services, "No");
    assert!(!payload.submission_date.is_empty());

    assert_eq!(h.storage.get(SUBMITTED_KEY).as_deref(), Some("true"));
    assert!(h.storage.get(DRAFT_KEY).is_none());
    assert_eq!(h.view.snapshot().location.as_deref(), Some("success.html"));
}

#[tokio::test]
async fn test_invalid_email_blocks_submission() {
    let mut h = create_harness(FakeDelivery::default(), MemorySessionStorage::new());
    let input = VALID_INPUT.replace("email=a@b.com", "email=not-an-email") + ":submit\n:quit\n";

    let summary = h.app.run(input.as_bytes()).await.unwrap();

    assert_eq!(
        summary.last_outcome,
        Some(SubmitOutcome::Invalid {
            first_invalid: Some("email".to_string())
        })
    );
    assert!(h.delivery.sent().is_empty());

    let view = h.view.snapshot();
    assert_eq!(view.errors.get("email").map(String::as_str), Some(EMAIL_MESSAGE));
    assert_eq!(view.scrolled_to, vec!["email".to_string()]);

    // 离开页面时草稿被保存
    assert_eq!(
        saved_draft(&h.storage).get("email").map(String::as_str),
        Some("not-an-email")
    );
}

#[tokio::test]
async fn test_rejected_send_keeps_form_resubmittable() {
    let mut h = create_harness(FakeDelivery::failing(), MemorySessionStorage::new());
    let input = format!("{}:submit\n", VALID_INPUT);

    let summary = h.app.run(input.as_bytes()).await.unwrap();

    assert!(matches!(summary.last_outcome, Some(SubmitOutcome::Failed { .. })));
    assert_eq!(h.delivery.sent().len(), 1);
    assert!(h.storage.get(SUBMITTED_KEY).is_none());

    let view = h.view.snapshot();
    assert!(!view.loading);
    assert_eq!(view.alerts, vec![GENERIC_FAILURE_MESSAGE.to_string()]);
    assert!(view.location.is_none());

    // 输入结束视为离开页面，草稿仍然保留
    assert_eq!(
        saved_draft(&h.storage).get("town").map(String::as_str),
        Some("Musanze")
    );
}

#[tokio::test]
async fn test_draft_is_restored_on_startup() {
    let storage = MemorySessionStorage::new();
    storage
        .set(
            DRAFT_KEY,
            r#"{"fullName":"Eric Habimana","gender":"Male","receivedServices":"Maybe"}"#,
        )
        .unwrap();

    let h = create_harness(FakeDelivery::default(), storage);
    let session = h.app.session();
    let session = session.lock().await;

    assert_eq!(session.registry.value_of("fullName"), Some("Eric Habimana"));
    assert_eq!(session.registry.value_of("gender"), Some("Male"));
    assert_eq!(session.registry.value_of("receivedServices"), None);
}

#[tokio::test]
async fn test_unknown_lines_are_ignored() {
    let mut h = create_harness(FakeDelivery::default(), MemorySessionStorage::new());

    let summary = h
        .app
        .run("hello\nnickname=Eric\ngender=Robot\n\n:quit\n".as_bytes())
        .await
        .unwrap();

    assert_eq!(summary.inputs, 2);
    assert_eq!(summary.submits, 0);
    assert!(saved_draft(&h.storage).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_autosave_captures_unsaved_value() {
    let h = create_harness(FakeDelivery::default(), MemorySessionStorage::new());
    let Harness {
        mut app, storage, ..
    } = h;
    let session = app.session();

    let (mut writer, reader) = tokio::io::duplex(1024);
    let running = tokio::spawn(async move { app.run(BufReader::new(reader)).await });

    // 直接修改字段值，不触发 change 事件
    session.lock().await.registry.set_value("fullName", "Eric");
    assert!(storage.get(DRAFT_KEY).is_none());

    tokio::time::sleep(Duration::from_secs(31)).await;
    assert_eq!(
        saved_draft(&storage).get("fullName").map(String::as_str),
        Some("Eric")
    );

    writer.write_all(b":quit\n").await.unwrap();
    let summary = running.await.unwrap().unwrap();
    assert!(!summary.submitted());
}

#[tokio::test(start_paused = true)]
async fn test_change_saves_draft_immediately() {
    let h = create_harness(FakeDelivery::default(), MemorySessionStorage::new());
    let Harness {
        mut app, storage, ..
    } = h;

    let (mut writer, reader) = tokio::io::duplex(1024);
    let running = tokio::spawn(async move { app.run(BufReader::new(reader)).await });

    writer.write_all(b"town=Kigali\n").await.unwrap();
    // 远小于自动保存间隔，且输入尚未结束
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(
        saved_draft(&storage).get("town").map(String::as_str),
        Some("Kigali")
    );

    drop(writer);
    let summary = running.await.unwrap().unwrap();
    assert_eq!(summary.inputs, 1);
}
