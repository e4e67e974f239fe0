#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use form_autofill::{
    Embedding, EmbeddingEngine, Error, FillConfig, FormDocument, NgramEngine, Profile,
    RawCandidate, Result,
};

/// How a structural lookup behaves for one fake field.
#[derive(Clone)]
pub enum Lookup {
    Found(String),
    Missing,
    Fails,
}

#[derive(Clone)]
pub struct FakeField {
    pub tag: String,
    pub heading: Lookup,
    pub block: Lookup,
    pub write_fails: bool,
}

impl FakeField {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            heading: Lookup::Missing,
            block: Lookup::Missing,
            write_fails: false,
        }
    }

    pub fn input(heading: &str) -> Self {
        Self::new("INPUT").heading(heading)
    }

    pub fn textarea(heading: &str) -> Self {
        Self::new("TEXTAREA").heading(heading)
    }

    pub fn textbox(heading: &str) -> Self {
        Self::new("DIV").heading(heading)
    }

    pub fn heading(mut self, text: &str) -> Self {
        self.heading = Lookup::Found(text.to_string());
        self
    }

    pub fn heading_fails(mut self) -> Self {
        self.heading = Lookup::Fails;
        self
    }

    pub fn block(mut self, text: &str) -> Self {
        self.block = Lookup::Found(text.to_string());
        self
    }

    pub fn block_fails(mut self) -> Self {
        self.block = Lookup::Fails;
        self
    }

    pub fn failing_write(mut self) -> Self {
        self.write_fails = true;
        self
    }
}

/// Every primitive the engine invoked, by field index.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Heading(usize),
    Block(usize, String),
    Scroll(usize),
    SetText(usize, String),
    SetValue(usize, String),
    DispatchInput(usize),
}

/// In-memory page that records the DOM calls made against it.
pub struct FakeDocument {
    fields: Vec<FakeField>,
    ready: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeDocument {
    pub fn new(fields: Vec<FakeField>) -> Self {
        Self {
            fields,
            ready: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn never_ready(mut self) -> Self {
        self.ready = false;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes_to(&self, index: usize) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(c,
                    Call::SetText(i, _) | Call::SetValue(i, _) | Call::DispatchInput(i) if *i == index)
            })
            .collect()
    }

    fn log(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn lookup(lookup: &Lookup) -> Result<Option<String>> {
        match lookup {
            Lookup::Found(text) => Ok(Some(text.clone())),
            Lookup::Missing => Ok(None),
            Lookup::Fails => Err(Error::ElementNotFound("no such node".into())),
        }
    }

    fn write(&self, index: usize, call: Call) -> Result<()> {
        if self.fields[index].write_fails {
            return Err(Error::JsError("element is detached".into()));
        }
        self.log(call);
        Ok(())
    }
}

#[async_trait]
impl FormDocument for FakeDocument {
    type Handle = usize;

    async fn wait_until_ready(&self, selector: &str, _timeout: Duration) -> Result<()> {
        if self.ready {
            Ok(())
        } else {
            Err(Error::Timeout(format!("selector {selector}")))
        }
    }

    async fn query_candidates(&self, _selector: &str) -> Result<Vec<RawCandidate<usize>>> {
        Ok(self
            .fields
            .iter()
            .enumerate()
            .map(|(handle, f)| RawCandidate {
                tag: f.tag.clone(),
                handle,
            })
            .collect())
    }

    async fn preceding_heading_text(&self, field: &usize) -> Result<Option<String>> {
        self.log(Call::Heading(*field));
        Self::lookup(&self.fields[*field].heading)
    }

    async fn question_block_text(&self, field: &usize, marker: &str) -> Result<Option<String>> {
        self.log(Call::Block(*field, marker.to_string()));
        Self::lookup(&self.fields[*field].block)
    }

    async fn scroll_into_view(&self, field: &usize) -> Result<()> {
        self.log(Call::Scroll(*field));
        Ok(())
    }

    async fn set_text_content(&self, field: &usize, value: &str) -> Result<()> {
        self.write(*field, Call::SetText(*field, value.to_string()))
    }

    async fn set_value(&self, field: &usize, value: &str) -> Result<()> {
        self.write(*field, Call::SetValue(*field, value.to_string()))
    }

    async fn dispatch_input_event(&self, field: &usize) -> Result<()> {
        self.write(*field, Call::DispatchInput(*field))
    }
}

/// Wraps the n-gram engine and counts how often each entry point is hit.
#[derive(Default)]
pub struct CountingEngine {
    inner: NgramEngine,
    pub singles: AtomicUsize,
    pub batches: AtomicUsize,
}

impl EmbeddingEngine for CountingEngine {
    fn encode(&self, text: &str) -> Result<Embedding> {
        self.singles.fetch_add(1, Ordering::SeqCst);
        self.inner.encode(text)
    }

    fn encode_many(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        self.inner.encode_many(texts)
    }
}

pub fn jane_profile() -> Profile {
    Profile::new([("Full Name", "Jane Doe"), ("Email", "jane@x.com")]).unwrap()
}

pub fn quick_config() -> FillConfig {
    FillConfig::default().pre_write_delay(Duration::ZERO)
}
