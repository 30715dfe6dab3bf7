// ABOUTME: Backend trait + TargetConfig + cache contract for secret/object operators

use crate::error::BackendError;
use crate::value::Value;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The sentinel value returned for every lookup while the global skip flag is
/// set, so documents can be parsed and structurally evaluated without live
/// credentials.
pub const REDACTED: &str = "REDACTED";

/// Process-wide switch: when set, no `Backend::lookup` is ever called and
/// every secret/object operator resolves to `REDACTED` instead.
static SKIP_BACKENDS: AtomicBool = AtomicBool::new(false);

pub fn skip_backends() -> bool {
    SKIP_BACKENDS.load(Ordering::Relaxed)
}

pub fn set_skip_backends(skip: bool) {
    SKIP_BACKENDS.store(skip, Ordering::Relaxed);
}

/// Narrow interface every remote operator family (`vault`, `awsparam`,
/// `awssecret`, `nats`) implements. Pooling, retries, and credential handling
/// are the concrete backend's problem; the evaluator only ever calls through
/// this trait.
#[async_trait]
pub trait Backend: Send + Sync {
    /// The `kind` values this backend accepts in `lookup` (e.g. `"secret"`
    /// for Vault, `"kv"`/`"obj"` for a key-value store).
    fn kind(&self) -> &'static str;

    async fn lookup(&self, target: &str, kind: &str, path: &str) -> Result<Value, BackendError>;

    fn config_for(&self, target: &str) -> Result<TargetConfig, BackendError>;

    fn get_cache(&self, target: &str, kind: &str, path: &str) -> Option<Value>;

    fn set_cache(&self, target: &str, kind: &str, path: &str, value: Value);
}

/// A named backend configuration, sourced from `<PREFIX>_<TARGET>_<OPTION>`
/// environment variables (e.g. `AWS_PRODUCTION_REGION`,
/// `NATS_PRODUCTION_URL`). Unrecognized options land in `extra` so a concrete
/// backend can read its own option names without `TargetConfig` needing to
/// know about them ahead of time.
#[derive(Debug, Clone)]
pub struct TargetConfig {
    pub timeout: Duration,
    pub retries: u32,
    pub cache_ttl: Duration,
    pub audit_log: bool,
    pub tls_ca_cert: Option<String>,
    pub tls_skip_verify: bool,
    pub extra: HashMap<String, String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        TargetConfig {
            timeout: Duration::from_secs(30),
            retries: 3,
            cache_ttl: Duration::from_secs(60),
            audit_log: false,
            tls_ca_cert: None,
            tls_skip_verify: false,
            extra: HashMap::new(),
        }
    }
}

impl TargetConfig {
    /// Build a `TargetConfig` for `target` by scanning the process
    /// environment for `<PREFIX>_<TARGET>_*` variables, uppercasing both the
    /// prefix and the target name the way `spec.md`'s backend contract
    /// specifies (`AWS_PRODUCTION_REGION` selects target `production` under
    /// prefix `AWS`).
    pub fn from_env(prefix: &str, target: &str) -> Self {
        let mut cfg = TargetConfig::default();
        let needle = format!("{}_{}_", prefix.to_ascii_uppercase(), target.to_ascii_uppercase());
        for (key, value) in std::env::vars() {
            let Some(option) = key.strip_prefix(&needle) else {
                continue;
            };
            match option.to_ascii_lowercase().as_str() {
                "timeout" => {
                    if let Ok(secs) = value.parse::<u64>() {
                        cfg.timeout = Duration::from_secs(secs);
                    }
                }
                "retries" => {
                    if let Ok(n) = value.parse::<u32>() {
                        cfg.retries = n;
                    }
                }
                "cache_ttl" => {
                    if let Ok(secs) = value.parse::<u64>() {
                        cfg.cache_ttl = Duration::from_secs(secs);
                    }
                }
                "audit_log" => cfg.audit_log = value.eq_ignore_ascii_case("true"),
                "tls_ca_cert" => cfg.tls_ca_cert = Some(value),
                "tls_skip_verify" => cfg.tls_skip_verify = value.eq_ignore_ascii_case("true"),
                other => {
                    cfg.extra.insert(other.to_string(), value);
                }
            }
        }
        cfg
    }
}

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

/// A `(target, kind, path)`-keyed cache shared by backend implementations.
/// Reads take a shared lock; writes an exclusive one, matching spec.md §5's
/// "writes use per-target locks; reads take a shared lock" (one `RwLock`
/// covering the whole map gives the same guarantee without per-target
/// sharding complexity).
pub struct Cache {
    entries: RwLock<HashMap<(String, String, String), CacheEntry>>,
}

impl Cache {
    pub fn new() -> Self {
        Cache {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn key(target: &str, kind: &str, path: &str) -> (String, String, String) {
        (target.to_string(), kind.to_string(), path.to_string())
    }

    pub fn get(&self, target: &str, kind: &str, path: &str) -> Option<Value> {
        let entries = self.entries.read();
        let entry = entries.get(&Self::key(target, kind, path))?;
        if entry.expires_at <= Instant::now() {
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn set(&self, target: &str, kind: &str, path: &str, value: Value, ttl: Duration) {
        let mut entries = self.entries.write();
        entries.insert(
            Self::key(target, kind, path),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps an operator family name (`vault`, `awsparam`, `awssecret`, `nats`) to
/// its configured `Backend`. Populated by the caller that constructs an
/// `Evaluator` — the evaluator itself never knows how to build a concrete
/// backend, only how to call through the trait.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: HashMap<&'static str, Arc<dyn Backend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        BackendRegistry {
            backends: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &'static str, backend: Arc<dyn Backend>) {
        self.backends.insert(name, backend);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Backend>> {
        self.backends.get(name).cloned()
    }
}
