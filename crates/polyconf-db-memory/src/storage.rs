//! Concurrent-map implementation of the storage contract.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use polyconf_core::{Configuration, DomainRecord, LanguageCode, Translation, now_utc};
use polyconf_storage::{
    ConfigStorage, DomainUpdate, NewConfiguration, NewDomain, PageParams, StorageError,
};

/// In-memory storage backend.
///
/// Domains are indexed both by id and by name; the name index is the
/// uniqueness authority, mirroring the unique index the PostgreSQL
/// backend relies on.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    domains: DashMap<i64, DomainRecord>,
    domain_ids_by_name: DashMap<String, i64>,
    configurations: DashMap<i64, Configuration>,
    translations: DashMap<(i64, String), Translation>,
    next_domain_id: AtomicI64,
    next_config_id: AtomicI64,
    next_translation_id: AtomicI64,
}

impl MemoryStorage {
    /// Creates an empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a translation row directly.
    ///
    /// Translation authoring is outside the `ConfigStorage` contract,
    /// so tests and fixtures insert rows through this helper. Replaces
    /// any existing translation for the same `(config_id, language)`.
    pub fn insert_translation(
        &self,
        config_id: i64,
        language: LanguageCode,
        title: impl Into<String>,
        author: impl Into<String>,
        description: impl Into<String>,
        keywords: Vec<String>,
    ) -> Translation {
        let translation = Translation {
            id: self.next_translation_id.fetch_add(1, Ordering::Relaxed) + 1,
            config_id,
            language: language.clone(),
            title: title.into(),
            author: author.into(),
            description: description.into(),
            keywords,
        };
        self.translations
            .insert((config_id, language.into_string()), translation.clone());
        translation
    }

    /// Removes a translation row, if present. Test helper.
    pub fn remove_translation(&self, config_id: i64, language: &LanguageCode) {
        self.translations
            .remove(&(config_id, language.as_str().to_string()));
    }
}

#[async_trait]
impl ConfigStorage for MemoryStorage {
    async fn create_domain(&self, new: NewDomain) -> Result<DomainRecord, StorageError> {
        // The name-index entry is the atomic claim on the unique name;
        // a losing racer sees Occupied here, same as a 23505 in Postgres.
        match self.domain_ids_by_name.entry(new.name.clone()) {
            Entry::Occupied(_) => Err(StorageError::already_exists("domain", new.name)),
            Entry::Vacant(slot) => {
                let id = self.next_domain_id.fetch_add(1, Ordering::Relaxed) + 1;
                let now = now_utc();
                let record = DomainRecord {
                    id,
                    name: new.name,
                    config_id: new.config_id,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(id);
                self.domains.insert(id, record.clone());
                Ok(record)
            }
        }
    }

    async fn get_domain(&self, id: i64) -> Result<Option<DomainRecord>, StorageError> {
        Ok(self.domains.get(&id).map(|entry| entry.clone()))
    }

    async fn get_domain_by_name(&self, name: &str) -> Result<Option<DomainRecord>, StorageError> {
        let Some(id) = self.domain_ids_by_name.get(name).map(|entry| *entry) else {
            return Ok(None);
        };
        Ok(self.domains.get(&id).map(|entry| entry.clone()))
    }

    async fn update_domain(
        &self,
        id: i64,
        update: DomainUpdate,
    ) -> Result<DomainRecord, StorageError> {
        let current = self
            .domains
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or_else(|| StorageError::not_found("domain", id.to_string()))?;

        // Lock order: name index first, then domains, same as
        // create_domain. No guard on one map is held while taking a
        // guard on the other.
        let rename = update.name.filter(|new_name| *new_name != current.name);
        if let Some(new_name) = &rename {
            match self.domain_ids_by_name.entry(new_name.clone()) {
                Entry::Occupied(_) => {
                    return Err(StorageError::already_exists("domain", new_name.clone()));
                }
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
        }

        let Some(mut entry) = self.domains.get_mut(&id) else {
            // Deleted between the snapshot and here. Release the claim.
            if let Some(new_name) = &rename {
                self.domain_ids_by_name.remove(new_name);
            }
            return Err(StorageError::not_found("domain", id.to_string()));
        };
        let old_name = entry.name.clone();
        if let Some(new_name) = rename {
            entry.name = new_name;
        }
        if let Some(config_id) = update.config_id {
            entry.config_id = config_id;
        }
        entry.updated_at = now_utc();
        let updated = entry.clone();
        drop(entry);

        if updated.name != old_name {
            self.domain_ids_by_name.remove(&old_name);
        }
        Ok(updated)
    }

    async fn delete_domain(&self, id: i64) -> Result<DomainRecord, StorageError> {
        let (_, record) = self
            .domains
            .remove(&id)
            .ok_or_else(|| StorageError::not_found("domain", id.to_string()))?;
        self.domain_ids_by_name.remove(&record.name);
        Ok(record)
    }

    async fn list_domains(&self, params: PageParams) -> Result<Vec<DomainRecord>, StorageError> {
        let mut all: Vec<DomainRecord> = self
            .domains
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by_key(|domain| domain.id);

        let offset = usize::try_from(params.offset()).unwrap_or(usize::MAX);
        let page = all
            .into_iter()
            .skip(offset)
            .take(params.page_size() as usize)
            .collect();
        Ok(page)
    }

    async fn count_domains(&self) -> Result<u64, StorageError> {
        Ok(self.domains.len() as u64)
    }

    async fn create_configuration(
        &self,
        new: NewConfiguration,
    ) -> Result<Configuration, StorageError> {
        let id = self.next_config_id.fetch_add(1, Ordering::Relaxed) + 1;
        let now = now_utc();
        let configuration = Configuration {
            id,
            links: new.links,
            permissions: new.permissions,
            created_at: now,
            updated_at: now,
        };
        self.configurations.insert(id, configuration.clone());
        Ok(configuration)
    }

    async fn get_configuration(&self, id: i64) -> Result<Option<Configuration>, StorageError> {
        Ok(self.configurations.get(&id).map(|entry| entry.clone()))
    }

    async fn get_translation(
        &self,
        config_id: i64,
        language: &LanguageCode,
    ) -> Result<Option<Translation>, StorageError> {
        Ok(self
            .translations
            .get(&(config_id, language.as_str().to_string()))
            .map(|entry| entry.clone()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn language(tag: &str) -> LanguageCode {
        LanguageCode::parse(tag).unwrap()
    }

    #[tokio::test]
    async fn domain_crud_round_trip() {
        let storage = MemoryStorage::new();
        let config = storage
            .create_configuration(NewConfiguration::default())
            .await
            .unwrap();

        let created = storage
            .create_domain(NewDomain {
                name: "example.com".into(),
                config_id: config.id,
            })
            .await
            .unwrap();

        let by_name = storage
            .get_domain_by_name("example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name.id, created.id);

        let deleted = storage.delete_domain(created.id).await.unwrap();
        assert_eq!(deleted.name, "example.com");
        assert!(
            storage
                .get_domain_by_name("example.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn duplicate_domain_name_is_a_conflict() {
        let storage = MemoryStorage::new();
        let new = NewDomain {
            name: "example.com".into(),
            config_id: 1,
        };
        storage.create_domain(new.clone()).await.unwrap();

        let err = storage.create_domain(new).await.unwrap_err();
        assert!(err.is_already_exists());
    }

    #[tokio::test]
    async fn rename_frees_the_old_name_and_claims_the_new_one() {
        let storage = MemoryStorage::new();
        let created = storage
            .create_domain(NewDomain {
                name: "old.example".into(),
                config_id: 1,
            })
            .await
            .unwrap();

        storage
            .update_domain(
                created.id,
                DomainUpdate {
                    name: Some("new.example".into()),
                    config_id: None,
                },
            )
            .await
            .unwrap();

        assert!(
            storage
                .get_domain_by_name("old.example")
                .await
                .unwrap()
                .is_none()
        );
        let renamed = storage
            .get_domain_by_name("new.example")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.id, created.id);

        // The freed name is reusable.
        storage
            .create_domain(NewDomain {
                name: "old.example".into(),
                config_id: 1,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_missing_domain_is_not_found() {
        let storage = MemoryStorage::new();
        let err = storage
            .update_domain(42, DomainUpdate::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn list_is_ordered_and_bounded() {
        let storage = MemoryStorage::new();
        for i in 0..25 {
            storage
                .create_domain(NewDomain {
                    name: format!("site-{i}.example"),
                    config_id: 1,
                })
                .await
                .unwrap();
        }

        let params = PageParams::new(2, 10).unwrap();
        let page = storage.list_domains(params).await.unwrap();
        assert_eq!(page.len(), 10);
        assert!(page.windows(2).all(|pair| pair[0].id < pair[1].id));

        let last = storage
            .list_domains(PageParams::new(3, 10).unwrap())
            .await
            .unwrap();
        assert_eq!(last.len(), 5);

        assert_eq!(storage.count_domains().await.unwrap(), 25);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_and_renames_complete() {
        use std::sync::Arc;

        let storage = Arc::new(MemoryStorage::new());

        let mut handles = Vec::new();
        for task in 0..8 {
            let storage = Arc::clone(&storage);
            handles.push(tokio::spawn(async move {
                for round in 0..50 {
                    let created = storage
                        .create_domain(NewDomain {
                            name: format!("site-{task}-{round}.example"),
                            config_id: 1,
                        })
                        .await
                        .unwrap();
                    storage
                        .update_domain(
                            created.id,
                            DomainUpdate {
                                name: Some(format!("renamed-{task}-{round}.example")),
                                config_id: None,
                            },
                        )
                        .await
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(storage.count_domains().await.unwrap(), 8 * 50);
        let renamed = storage
            .get_domain_by_name("renamed-0-0.example")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "renamed-0-0.example");
        assert!(
            storage
                .get_domain_by_name("site-0-0.example")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn translation_lookup_by_composite_key() {
        let storage = MemoryStorage::new();
        storage.insert_translation(
            7,
            language("zh-cn"),
            "示例",
            "团队",
            "示例站点",
            vec!["示例".into()],
        );

        let hit = storage
            .get_translation(7, &language("zh-cn"))
            .await
            .unwrap();
        assert_eq!(hit.unwrap().title, "示例");

        let miss = storage
            .get_translation(7, &language("en-us"))
            .await
            .unwrap();
        assert!(miss.is_none());
    }
}
