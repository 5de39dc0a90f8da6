use crate::error::{Result, ShortenerError};
use crate::settings::ShortenerSettings;
use crate::shortener::Shortener;
use crate::validate::validate_long_url;
use async_trait::async_trait;
use linkhop_core::{Clock, LinkRow, NewLink, Repository, SystemClock};
use linkhop_generator::Generator;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Mints new short links.
///
/// Each attempt draws a fresh code from the `Generator` and inserts it. A
/// unique violation from the store means the code is taken and another one is
/// tried; every other store error is returned immediately.
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    settings: ShortenerSettings,
    clock: Arc<dyn Clock>,
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    pub fn new(repository: R, generator: G, settings: ShortenerSettings) -> Self {
        Self::with_clock(repository, generator, settings, Arc::new(SystemClock))
    }

    pub fn with_clock(
        repository: R,
        generator: G,
        settings: ShortenerSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            settings,
            clock,
        }
    }

    /// Stores an already validated URL under a new unique code.
    pub async fn create(&self, long_url: String) -> Result<LinkRow> {
        let created_at = self.clock.now();
        let expires_at = created_at + self.settings.ttl_days.as_duration();
        let max_attempts = self.settings.max_attempts.get();

        for attempt in 1..=max_attempts {
            let code = self.generator.generate(self.settings.code_length);
            let link = NewLink {
                code: code.clone(),
                long_url: long_url.clone(),
                created_at,
                expires_at,
            };

            match self.repository.insert(link).await {
                Ok(row) => {
                    debug!(code = %code, attempt, "Created short link");
                    return Ok(row);
                }
                Err(err) if err.is_unique_violation() => {
                    warn!(code = %code, attempt, "Short code collision, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        error!(attempts = max_attempts, "Exhausted short code attempts");
        Err(ShortenerError::ExhaustedRetries {
            attempts: max_attempts,
        })
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, long_url: &str) -> Result<LinkRow> {
        let normalized = validate_long_url(long_url)?;
        self.create(normalized).await
    }
}

impl<R, G> Clone for ShortenerService<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
            settings: self.settings.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, G> std::fmt::Debug for ShortenerService<R, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortenerService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UrlError;
    use crate::settings::TtlDays;
    use jiff::Timestamp;
    use linkhop_core::repository::Result as StoreResult;
    use linkhop_core::{ManualClock, ReadRepository, ShortCode, StorageError};
    use linkhop_generator::{Base62Generator, CodeLength};
    use linkhop_storage::InMemoryRepository;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::num::NonZeroU32;
    use std::sync::atomic::{AtomicU32, Ordering};

    const NOW_MS: i64 = 1_767_225_600_000;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    /// Hands out a fixed sequence of codes, then repeats the last one.
    struct ScriptedGenerator {
        codes: Mutex<VecDeque<&'static str>>,
        last: &'static str,
    }

    impl ScriptedGenerator {
        fn new(codes: &[&'static str]) -> Self {
            Self {
                codes: Mutex::new(codes.iter().copied().collect()),
                last: codes.last().copied().unwrap_or("zzzzzzz"),
            }
        }
    }

    impl Generator for ScriptedGenerator {
        fn generate(&self, _length: CodeLength) -> ShortCode {
            code(self.codes.lock().pop_front().unwrap_or(self.last))
        }
    }

    /// Fails the first `collisions` inserts with a unique violation, or every
    /// insert with `failure` when set.
    struct ScriptedRepository {
        inner: InMemoryRepository,
        collisions: u32,
        failure: Option<StorageError>,
        attempts: AtomicU32,
    }

    impl ScriptedRepository {
        fn colliding(collisions: u32) -> Self {
            Self {
                inner: InMemoryRepository::new(),
                collisions,
                failure: None,
                attempts: AtomicU32::new(0),
            }
        }

        fn failing(err: StorageError) -> Self {
            Self {
                failure: Some(err),
                ..Self::colliding(0)
            }
        }
    }

    #[async_trait]
    impl ReadRepository for ScriptedRepository {
        async fn get_by_code(&self, code: &ShortCode) -> StoreResult<Option<LinkRow>> {
            self.inner.get_by_code(code).await
        }
    }

    #[async_trait]
    impl Repository for ScriptedRepository {
        async fn insert(&self, link: NewLink) -> StoreResult<LinkRow> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(err) = &self.failure {
                return Err(err.clone());
            }
            if attempt <= self.collisions {
                return Err(StorageError::UniqueViolation(link.code.to_string()));
            }
            self.inner.insert(link).await
        }
    }

    fn service<R: Repository, G: Generator>(repo: R, generator: G) -> ShortenerService<R, G> {
        ShortenerService::with_clock(
            repo,
            generator,
            ShortenerSettings::default(),
            Arc::new(ManualClock::at_millis(NOW_MS)),
        )
    }

    #[tokio::test]
    async fn creates_link_with_ttl_expiry() {
        let service = service(InMemoryRepository::new(), ScriptedGenerator::new(&["abc1234"]));

        let row = service.create("https://example.com/".to_string()).await.unwrap();

        assert_eq!(row.code, "abc1234");
        assert_eq!(row.long_url, "https://example.com/");
        assert_eq!(row.created_at, "2026-01-01T00:00:00.000Z");
        assert_eq!(row.expires_at, "2026-01-31T00:00:00.000Z");
    }

    #[tokio::test]
    async fn retries_until_a_free_code_is_found() {
        let repo = Arc::new(ScriptedRepository::colliding(3));
        let service = service(
            Arc::clone(&repo),
            ScriptedGenerator::new(&["aaaa", "bbbb", "cccc", "dddd"]),
        );

        let row = service.create("https://example.com/".to_string()).await.unwrap();

        assert_eq!(row.code, "dddd");
        assert_eq!(repo.attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn succeeds_on_the_last_allowed_attempt() {
        let repo = Arc::new(ScriptedRepository::colliding(7));
        let service = service(
            Arc::clone(&repo),
            ScriptedGenerator::new(&[
                "code001", "code002", "code003", "code004", "code005", "code006", "code007",
                "code008",
            ]),
        );

        let row = service.create("https://example.com/".to_string()).await.unwrap();

        assert_eq!(row.code, "code008");
        assert_eq!(repo.attempts.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn collides_with_existing_rows() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.insert(NewLink {
            code: code("taken12"),
            long_url: "https://first.example/".to_string(),
            created_at: Timestamp::from_millisecond(NOW_MS).unwrap(),
            expires_at: Timestamp::from_millisecond(NOW_MS + 1_000).unwrap(),
        })
        .await
        .unwrap();

        let service = service(
            Arc::clone(&repo),
            ScriptedGenerator::new(&["taken12", "fresh12"]),
        );
        let row = service.create("https://second.example/".to_string()).await.unwrap();

        assert_eq!(row.code, "fresh12");
        let original = repo.get_by_code(&code("taken12")).await.unwrap().unwrap();
        assert_eq!(original.long_url, "https://first.example/");
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let repo = Arc::new(ScriptedRepository::colliding(u32::MAX));
        let service = service(Arc::clone(&repo), ScriptedGenerator::new(&["same123"]));

        let err = service
            .create("https://example.com/".to_string())
            .await
            .unwrap_err();

        assert_eq!(err, ShortenerError::ExhaustedRetries { attempts: 8 });
        assert_eq!(repo.attempts.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn other_store_errors_are_not_retried() {
        let repo = Arc::new(ScriptedRepository::failing(StorageError::Unavailable(
            "connection refused".to_string(),
        )));
        let service = service(Arc::clone(&repo), ScriptedGenerator::new(&["abc1234"]));

        let err = service
            .create("https://example.com/".to_string())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ShortenerError::Storage(StorageError::Unavailable(_))
        ));
        assert_eq!(repo.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn shorten_validates_before_touching_the_store() {
        let repo = Arc::new(ScriptedRepository::colliding(0));
        let service = service(Arc::clone(&repo), ScriptedGenerator::new(&["abc1234"]));

        let err = service.shorten("javascript:alert(1)").await.unwrap_err();

        assert_eq!(err, ShortenerError::InvalidUrl(UrlError::UnsupportedScheme));
        assert_eq!(repo.attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn shorten_stores_the_normalized_url() {
        let service = service(InMemoryRepository::new(), ScriptedGenerator::new(&["abc1234"]));

        let row = service.shorten("https://example.com").await.unwrap();

        assert_eq!(row.long_url, "https://example.com/");
    }

    #[tokio::test]
    async fn honours_configured_length_and_ttl() {
        let settings = ShortenerSettings::builder()
            .code_length(CodeLength::new(12).unwrap())
            .ttl_days(TtlDays::new(1).unwrap())
            .max_attempts(NonZeroU32::new(2).unwrap())
            .build();
        let service = ShortenerService::with_clock(
            InMemoryRepository::new(),
            Base62Generator::new(),
            settings,
            Arc::new(ManualClock::at_millis(NOW_MS)),
        );

        let row = service.shorten("https://example.com/a").await.unwrap();

        assert_eq!(row.code.len(), 12);
        assert_eq!(row.expires_at, "2026-01-02T00:00:00.000Z");
    }
}
