use std::time::Duration;

use form_autofill::{FillConfig, FormSession, NgramEngine, Orchestrator, Profile};

const FORM_HTML: &str = r#"<!doctype html>
<html><head><title>Sign-up</title></head><body>
<form>
  <div class="Qr7Oae"><div role="heading">Your full name</div><input id="name"></div>
  <div class="Qr7Oae"><div role="heading">Email</div><textarea id="email"></textarea></div>
  <div class="Qr7Oae"><div role="heading">Favorite color</div><input id="color"></div>
  <div class="Qr7Oae"><div role="heading">Address</div><div role="textbox" id="addr"></div></div>
</form>
<script>
  window.inputEvents = 0;
  document.querySelector('form').addEventListener('input', () => window.inputEvents++);
</script>
</body></html>"#;

async fn eval(page: &form_autofill::Page, js: &str) -> serde_json::Value {
    page.inner()
        .evaluate(js)
        .await
        .expect("evaluate")
        .into_value()
        .expect("json value")
}

#[tokio::test]
#[ignore = "needs a local Chrome install"]
async fn test_fill_google_style_form() {
    let session = FormSession::builder()
        .headless(true)
        .build()
        .await
        .expect("Failed to launch browser");

    let url = format!("data:text/html,{}", FORM_HTML.replace('#', "%23"));
    let page = session.open_form(&url).await.expect("Failed to open page");
    assert_eq!(page.title().await.expect("title"), "Sign-up");
    page.wait_for_selector("form").await.expect("form present");

    let profile = Profile::new([
        ("Full Name", "Jane Doe"),
        ("Email", "jane@x.com"),
        ("Address", "Pune"),
    ])
    .unwrap();
    let config = FillConfig::default().pre_write_delay(Duration::from_millis(10));
    let report = Orchestrator::new(NgramEngine::new(), config)
        .run(&page, &profile)
        .await
        .expect("fill run");

    assert_eq!((report.detected, report.filled), (4, 3));
    assert_eq!(eval(&page, "document.getElementById('name').value").await, "Jane Doe");
    assert_eq!(eval(&page, "document.getElementById('email').value").await, "jane@x.com");
    assert_eq!(eval(&page, "document.getElementById('color').value").await, "");
    assert_eq!(eval(&page, "document.getElementById('addr').innerText").await, "Pune");
    assert_eq!(eval(&page, "window.inputEvents").await, 2);

    session.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "needs a local Chrome install"]
async fn test_missing_form_times_out() {
    let session = FormSession::builder()
        .headless(true)
        .build()
        .await
        .expect("Failed to launch browser");

    let page = session
        .open_form("data:text/html,<p>no form here</p>")
        .await
        .expect("Failed to open page");

    let config = FillConfig::default().ready_timeout(Duration::from_millis(300));
    let err = Orchestrator::new(NgramEngine::new(), config)
        .run(&page, &Profile::sample())
        .await
        .unwrap_err();
    assert!(matches!(err, form_autofill::Error::Timeout(_)));

    session.close().await.expect("Failed to close browser");
}
