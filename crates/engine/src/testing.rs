//! Fakes shared by the unit tests.

use std::{
    ffi::OsStr,
    sync::{Arc, Mutex},
};

use chrono::{DateTime, TimeZone, Utc};
use fileprops_fs::{Platform, ProcessError, ProcessRunner};
use fileprops_runtime::Settings;
use serde_json::Value;

use crate::{
    assets::{Assets, Icons},
    env::{Clock, RenderEnv},
    format::ModeBits,
    markup::Markup,
};

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Canned process output keyed by program name. Unknown programs fail.
#[derive(Default)]
pub struct FakeRunner {
    answers: Mutex<Vec<(String, Option<String>)>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeRunner {
    /// `stat` answering owner and group names.
    pub fn stat(user: &str, group: &str) -> Self {
        let runner = Self::default();
        runner.answer("stat %U", Some(user));
        runner.answer("stat %G", Some(group));
        runner.answer("stat %Su", Some(user));
        runner.answer("stat %Sg", Some(group));
        runner
    }

    /// Register an answer for `program` whose last format argument (if any)
    /// matches. `None` makes the call fail.
    pub fn answer(&self, key: &str, output: Option<&str>) {
        self.answers
            .lock()
            .unwrap()
            .push((key.to_owned(), output.map(str::to_owned)));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProcessRunner for FakeRunner {
    fn run(
        &self,
        program: &str,
        args: &[&OsStr],
        _env: &[(&str, &OsStr)],
    ) -> Result<String, ProcessError> {
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        self.calls
            .lock()
            .unwrap()
            .push(format!("{program} {}", args.join(" ")));

        let stat_key = args.get(1).map(|fmt| format!("{program} {fmt}"));
        let answers = self.answers.lock().unwrap();
        let answer = answers
            .iter()
            .find(|(key, _)| key == program || Some(key) == stat_key.as_ref())
            .and_then(|(_, out)| out.clone());

        answer.ok_or_else(|| ProcessError::Failed {
            program: program.to_owned(),
            status: "exit status: 1".into(),
            stderr: "no canned answer".into(),
        })
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn plain_icons() -> Icons {
    Icons {
        copy: Markup::raw("<svg class=\"i-copy\"/>"),
        edit: Markup::raw("<svg class=\"i-edit\"/>"),
        external: Markup::raw("<svg class=\"i-external\"/>"),
    }
}

pub fn settings(pairs: &[(&str, Value)]) -> Arc<Settings> {
    let settings = Settings::default();
    for (key, value) in pairs {
        settings.set(*key, value.clone());
    }
    Arc::new(settings)
}

/// Linux-like environment with fake processes and a fixed clock.
pub fn env(settings: Arc<Settings>, runner: Arc<FakeRunner>) -> RenderEnv {
    let assets = Assets {
        icons: plain_icons(),
        ..Assets::bundled()
    };

    RenderEnv::new(settings, Arc::new(assets))
        .with_processes(runner)
        .with_clock(Arc::new(FixedClock(fixed_now())))
        .with_platform(Platform::Linux, ModeBits::all())
}
