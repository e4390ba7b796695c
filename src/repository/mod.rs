use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::PgPool;

use crate::cache::{self, TtlCache};

/// 一个具名集合与底层存储的绑定：集合名、投影列以及五个存储操作。
/// SQL 由各实体自己持有，仓库层只负责缓存纪律。
pub trait Collection: Sized + Serialize + DeserializeOwned + Send + Sync {
    type Id: fmt::Display + Send + Sync;
    type New: Send + Sync;
    type Patch: Send + Sync;

    const NAME: &'static str;
    const COLUMNS: &'static str;

    fn insert(
        pool: &PgPool,
        new: &Self::New,
    ) -> impl Future<Output = Result<Self, sqlx::Error>> + Send;

    fn fetch_by_id(
        pool: &PgPool,
        id: &Self::Id,
    ) -> impl Future<Output = Result<Option<Self>, sqlx::Error>> + Send;

    fn fetch_all(pool: &PgPool) -> impl Future<Output = Result<Vec<Self>, sqlx::Error>> + Send;

    fn apply_patch(
        pool: &PgPool,
        id: &Self::Id,
        patch: &Self::Patch,
    ) -> impl Future<Output = Result<Option<Self>, sqlx::Error>> + Send;

    fn remove(
        pool: &PgPool,
        id: &Self::Id,
    ) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;
}

#[derive(Debug)]
pub enum RepoError {
    NotFound,
    Database(sqlx::Error),
    Serialization(serde_json::Error),
}

impl fmt::Display for RepoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoError::NotFound => write!(f, "record not found"),
            RepoError::Database(e) => write!(f, "database error: {}", e),
            RepoError::Serialization(e) => write!(f, "serialization error: {}", e),
        }
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        RepoError::Database(e)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(e: serde_json::Error) -> Self {
        RepoError::Serialization(e)
    }
}

/// 带读缓存的通用仓库：读走缓存，写后整组失效，未命中时回源并回填。
pub struct CachedRepository<T: Collection> {
    pool: PgPool,
    cache: Arc<TtlCache>,
    _marker: PhantomData<T>,
}

impl<T: Collection> CachedRepository<T> {
    pub fn new(pool: PgPool, cache: Arc<TtlCache>) -> Self {
        Self {
            pool,
            cache,
            _marker: PhantomData,
        }
    }

    pub async fn create(&self, new: T::New) -> Result<T, RepoError> {
        let record = T::insert(&self.pool, &new).await?;
        self.cache.invalidate_collection(T::NAME);
        Ok(record)
    }

    pub async fn get_by_id(&self, id: &T::Id) -> Result<T, RepoError> {
        let key = cache::item_key(T::NAME, &id.to_string(), T::COLUMNS);
        if let Some(value) = self.cache.get(&key) {
            return Ok(serde_json::from_value(value)?);
        }

        // 不存在的记录不会进入缓存
        let record = T::fetch_by_id(&self.pool, id)
            .await?
            .ok_or(RepoError::NotFound)?;
        self.cache
            .put(T::NAME, key, serde_json::to_value(&record)?);
        Ok(record)
    }

    pub async fn get_all(&self) -> Result<Vec<T>, RepoError> {
        let key = cache::list_key(T::NAME, T::COLUMNS);
        if let Some(value) = self.cache.get(&key) {
            return Ok(serde_json::from_value(value)?);
        }

        let records = T::fetch_all(&self.pool).await?;
        self.cache
            .put(T::NAME, key, serde_json::to_value(&records)?);
        Ok(records)
    }

    pub async fn update(&self, id: &T::Id, patch: T::Patch) -> Result<T, RepoError> {
        let record = T::apply_patch(&self.pool, id, &patch)
            .await?
            .ok_or(RepoError::NotFound)?;
        // 单条更新可能改变列表的成员或顺序，保守地整组失效
        self.cache.invalidate_collection(T::NAME);
        Ok(record)
    }

    pub async fn delete(&self, id: &T::Id) -> Result<(), RepoError> {
        let removed = T::remove(&self.pool, id).await?;
        if !removed {
            return Err(RepoError::NotFound);
        }
        self.cache.invalidate_collection(T::NAME);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Scroll {
        id: i64,
        title: String,
    }

    struct NewScroll {
        id: i64,
        title: String,
    }

    #[derive(Default)]
    struct ScrollPatch {
        title: Option<String>,
    }

    fn table() -> &'static Mutex<HashMap<i64, Scroll>> {
        static TABLE: OnceLock<Mutex<HashMap<i64, Scroll>>> = OnceLock::new();
        TABLE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    fn fetches() -> &'static Mutex<HashMap<i64, usize>> {
        static FETCHES: OnceLock<Mutex<HashMap<i64, usize>>> = OnceLock::new();
        FETCHES.get_or_init(|| Mutex::new(HashMap::new()))
    }

    fn fetch_count(id: i64) -> usize {
        fetches().lock().unwrap().get(&id).copied().unwrap_or(0)
    }

    static LIST_FETCHES: AtomicUsize = AtomicUsize::new(0);

    impl Collection for Scroll {
        type Id = i64;
        type New = NewScroll;
        type Patch = ScrollPatch;

        const NAME: &'static str = "scrolls";
        const COLUMNS: &'static str = "id, title";

        async fn insert(_pool: &PgPool, new: &NewScroll) -> Result<Self, sqlx::Error> {
            let record = Scroll {
                id: new.id,
                title: new.title.clone(),
            };
            table().lock().unwrap().insert(new.id, record.clone());
            Ok(record)
        }

        async fn fetch_by_id(_pool: &PgPool, id: &i64) -> Result<Option<Self>, sqlx::Error> {
            *fetches().lock().unwrap().entry(*id).or_insert(0) += 1;
            Ok(table().lock().unwrap().get(id).cloned())
        }

        async fn fetch_all(_pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
            LIST_FETCHES.fetch_add(1, Ordering::SeqCst);
            Ok(table().lock().unwrap().values().cloned().collect())
        }

        async fn apply_patch(
            _pool: &PgPool,
            id: &i64,
            patch: &ScrollPatch,
        ) -> Result<Option<Self>, sqlx::Error> {
            let mut table = table().lock().unwrap();
            Ok(table.get_mut(id).map(|record| {
                if let Some(title) = &patch.title {
                    record.title = title.clone();
                }
                record.clone()
            }))
        }

        async fn remove(_pool: &PgPool, id: &i64) -> Result<bool, sqlx::Error> {
            Ok(table().lock().unwrap().remove(id).is_some())
        }
    }

    fn repo() -> CachedRepository<Scroll> {
        let pool = PgPool::connect_lazy("postgres://postgres@127.0.0.1:1/league")
            .expect("lazy pool");
        CachedRepository::new(pool, Arc::new(TtlCache::new(Duration::from_secs(60))))
    }

    #[tokio::test]
    async fn get_after_create_is_served_from_cache() {
        let repo = repo();
        let created = repo
            .create(NewScroll {
                id: 101,
                title: "卷轴一".into(),
            })
            .await
            .unwrap();

        let first = repo.get_by_id(&101).await.unwrap();
        let second = repo.get_by_id(&101).await.unwrap();
        assert_eq!(first, created);
        assert_eq!(second, created);
        // 第一次读回源，第二次命中缓存
        assert_eq!(fetch_count(101), 1);
    }

    #[tokio::test]
    async fn missing_record_is_not_cached_as_present() {
        let repo = repo();

        assert!(matches!(
            repo.get_by_id(&9999).await,
            Err(RepoError::NotFound)
        ));
        assert!(matches!(
            repo.get_by_id(&9999).await,
            Err(RepoError::NotFound)
        ));
        assert_eq!(fetch_count(9999), 2);
    }

    #[tokio::test]
    async fn update_invalidates_cached_item() {
        let repo = repo();
        repo.create(NewScroll {
            id: 202,
            title: "旧标题".into(),
        })
        .await
        .unwrap();

        repo.get_by_id(&202).await.unwrap();
        repo.get_by_id(&202).await.unwrap();
        assert_eq!(fetch_count(202), 1);

        let updated = repo
            .update(
                &202,
                ScrollPatch {
                    title: Some("新标题".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "新标题");

        // 更新后缓存失效，读取重新回源并拿到新值
        let fresh = repo.get_by_id(&202).await.unwrap();
        assert_eq!(fresh.title, "新标题");
        assert_eq!(fetch_count(202), 2);
    }

    #[tokio::test]
    async fn delete_invalidates_and_surfaces_not_found() {
        let repo = repo();
        repo.create(NewScroll {
            id: 303,
            title: "将删".into(),
        })
        .await
        .unwrap();
        repo.get_by_id(&303).await.unwrap();

        repo.delete(&303).await.unwrap();
        assert!(matches!(
            repo.get_by_id(&303).await,
            Err(RepoError::NotFound)
        ));
        assert!(matches!(repo.delete(&303).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn list_cache_is_invalidated_by_writes() {
        let repo = repo();
        let base = LIST_FETCHES.load(Ordering::SeqCst);

        repo.get_all().await.unwrap();
        repo.get_all().await.unwrap();
        assert_eq!(LIST_FETCHES.load(Ordering::SeqCst), base + 1);

        repo.create(NewScroll {
            id: 404,
            title: "新卷轴".into(),
        })
        .await
        .unwrap();

        let listed = repo.get_all().await.unwrap();
        assert_eq!(LIST_FETCHES.load(Ordering::SeqCst), base + 2);
        assert!(listed.iter().any(|s| s.id == 404));
    }
}
