use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::usecases::price_resolver::{PriceResolverError, PriceResolverUseCase};
use crate::domain::repositories::courses::CourseRepository;
use crate::domain::repositories::kv_store::KeyValueStore;
use crate::domain::repositories::price_policies::PricePolicyRepository;
use crate::domain::value_objects::cache_keys::CacheKey;
use crate::domain::value_objects::cart::{
    CartEntry, FIELD_DEFAULT_PRICE_POLICY_ID, PricePolicySnapshot,
};
use crate::domain::value_objects::priceable::PriceableRef;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("course not found")]
    CourseNotFound,
    #[error("price policy not found")]
    PriceNotFound,
    #[error("cart item not found")]
    CartItemNotFound,
    #[error(transparent)]
    Transient(#[from] anyhow::Error),
}

impl CartError {
    pub fn business_code(&self) -> u16 {
        match self {
            CartError::CourseNotFound => 1001,
            CartError::PriceNotFound => 1010,
            CartError::CartItemNotFound => 1044,
            CartError::Transient(_) => 1500,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CartError::CourseNotFound
            | CartError::PriceNotFound
            | CartError::CartItemNotFound => StatusCode::NOT_FOUND,
            CartError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<PriceResolverError> for CartError {
    fn from(err: PriceResolverError) -> Self {
        match err {
            PriceResolverError::PriceNotFound => CartError::PriceNotFound,
            PriceResolverError::Transient(err) => CartError::Transient(err),
        }
    }
}

/// Owns the per-(account, course) cart entries in the ephemeral store.
///
/// Writes are plain hash writes with no cross-key coordination; two
/// concurrent mutations of the same entry race with last-write-wins.
pub struct CartUseCase<C, P, K>
where
    C: CourseRepository + Send + Sync + 'static,
    P: PricePolicyRepository + Send + Sync + 'static,
    K: KeyValueStore + Send + Sync + 'static,
{
    course_repo: Arc<C>,
    price_resolver: Arc<PriceResolverUseCase<P>>,
    kv: Arc<K>,
}

impl<C, P, K> CartUseCase<C, P, K>
where
    C: CourseRepository + Send + Sync + 'static,
    P: PricePolicyRepository + Send + Sync + 'static,
    K: KeyValueStore + Send + Sync + 'static,
{
    pub fn new(
        course_repo: Arc<C>,
        price_resolver: Arc<PriceResolverUseCase<P>>,
        kv: Arc<K>,
    ) -> Self {
        Self {
            course_repo,
            price_resolver,
            kv,
        }
    }

    /// Every cart entry of the account. An empty cart is an empty list.
    pub async fn get(&self, account_id: i64) -> Result<Vec<CartEntry>, CartError> {
        let keys = self
            .kv
            .scan_keys(CacheKey::cart_pattern(account_id).as_str())
            .await?;

        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            // A key can vanish between scan and read; skip it rather than
            // failing the whole listing.
            let Some(fields) = self.kv.hash_get_all(&key).await? else {
                continue;
            };
            entries.push(CartEntry::from_hash(&fields)?);
        }

        debug!(account_id, count = entries.len(), "cart: entries listed");
        Ok(entries)
    }

    /// Put `course_id` in the cart with `price_policy_id` selected.
    /// Re-adding a course replaces its entry wholesale.
    pub async fn add(
        &self,
        account_id: i64,
        course_id: i64,
        price_policy_id: i64,
    ) -> Result<(), CartError> {
        let entity = PriceableRef::Course(course_id);
        let course = self
            .course_repo
            .find_priceable(entity)
            .await
            .map_err(CartError::Transient)?
            .ok_or_else(|| {
                warn!(account_id, course_id, "cart: course not in catalog");
                CartError::CourseNotFound
            })?;

        let selected = self
            .price_resolver
            .validate(entity, price_policy_id)
            .await?;
        let policies = self.price_resolver.list(entity).await?;
        let price_dict = policies
            .iter()
            .map(|policy| (policy.id, PricePolicySnapshot::from(policy)))
            .collect();

        let entry = CartEntry {
            course_id,
            course_title: course.title().to_string(),
            price_dict,
            default_price_policy_id: selected.id,
        };
        self.kv
            .hash_set(
                CacheKey::cart(account_id, course_id).as_str(),
                entry.to_hash_fields()?,
            )
            .await?;

        info!(
            account_id,
            course_id, price_policy_id, "cart: entry written"
        );
        Ok(())
    }

    /// Switch the selected policy of an existing entry. The policy id is
    /// validated against the entry's stored snapshot, not the durable
    /// catalog: the cart sells what it froze at add time.
    pub async fn update_selection(
        &self,
        account_id: i64,
        course_id: i64,
        price_policy_id: i64,
    ) -> Result<(), CartError> {
        let key = CacheKey::cart(account_id, course_id);
        let fields = self
            .kv
            .hash_get_all(key.as_str())
            .await?
            .ok_or_else(|| {
                warn!(account_id, course_id, "cart: no entry to update");
                CartError::CartItemNotFound
            })?;

        let entry = CartEntry::from_hash(&fields)?;
        if !entry.price_dict.contains_key(&price_policy_id) {
            warn!(
                account_id,
                course_id, price_policy_id, "cart: policy not in stored snapshot"
            );
            return Err(CartError::PriceNotFound);
        }

        self.kv
            .hash_set(
                key.as_str(),
                vec![(
                    FIELD_DEFAULT_PRICE_POLICY_ID.to_string(),
                    price_policy_id.to_string(),
                )],
            )
            .await?;

        info!(
            account_id,
            course_id, price_policy_id, "cart: selection updated"
        );
        Ok(())
    }

    pub async fn remove(&self, account_id: i64, course_id: i64) -> Result<(), CartError> {
        let key = CacheKey::cart(account_id, course_id);
        if !self.kv.exists(key.as_str()).await? {
            warn!(account_id, course_id, "cart: no entry to remove");
            return Err(CartError::CartItemNotFound);
        }
        self.kv.delete(key.as_str()).await?;

        info!(account_id, course_id, "cart: entry removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::domain::entities::courses::CourseEntity;
    use crate::domain::entities::price_policies::PricePolicyEntity;
    use crate::domain::repositories::courses::MockCourseRepository;
    use crate::domain::repositories::price_policies::MockPricePolicyRepository;
    use crate::domain::value_objects::enums::valid_periods::ValidPeriod;
    use crate::domain::value_objects::priceable::PriceableModel;
    use crate::infrastructure::kv::memory::InMemoryKv;

    fn course_row(id: i64, title: &str) -> CourseEntity {
        CourseEntity {
            id,
            title: title.to_string(),
            course_type: 0,
            degree_course_id: None,
            brief: String::new(),
            status: 0,
            created_at: chrono::Utc::now(),
        }
    }

    fn policy_row(id: i64, course_id: i64, valid_period: i16, price: i64) -> PricePolicyEntity {
        PricePolicyEntity {
            id,
            entity_kind: "course".to_string(),
            entity_id: course_id,
            valid_period,
            price: Decimal::new(price, 2),
        }
    }

    fn usecase_with(
        courses: Vec<CourseEntity>,
        policies: Vec<PricePolicyEntity>,
        kv: Arc<InMemoryKv>,
    ) -> CartUseCase<MockCourseRepository, MockPricePolicyRepository, InMemoryKv> {
        let mut course_repo = MockCourseRepository::new();
        course_repo.expect_find_priceable().returning(move |entity| {
            let found = courses
                .iter()
                .find(|course| entity == PriceableRef::Course(course.id))
                .cloned();
            Box::pin(async move { Ok(found.map(PriceableModel::Course)) })
        });

        let mut price_policy_repo = MockPricePolicyRepository::new();
        price_policy_repo
            .expect_list_for_entity()
            .returning(move |entity| {
                let rows: Vec<_> = policies
                    .iter()
                    .filter(|policy| {
                        policy.entity_kind == entity.kind()
                            && policy.entity_id == entity.entity_id()
                    })
                    .cloned()
                    .collect();
                Box::pin(async move { Ok(rows) })
            });

        CartUseCase::new(
            Arc::new(course_repo),
            Arc::new(PriceResolverUseCase::new(Arc::new(price_policy_repo))),
            kv,
        )
    }

    #[tokio::test]
    async fn added_entry_selects_a_snapshot_key() {
        let kv = Arc::new(InMemoryKv::new());
        let cart = usecase_with(
            vec![course_row(7, "Intro to Systems")],
            vec![policy_row(3, 7, 30, 19900), policy_row(4, 7, 90, 49900)],
            Arc::clone(&kv),
        );

        cart.add(5, 7, 3).await.unwrap();
        let entries = cart.get(5).await.unwrap();

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.course_id, 7);
        assert_eq!(entry.course_title, "Intro to Systems");
        assert_eq!(entry.default_price_policy_id, 3);
        assert!(entry.price_dict.contains_key(&entry.default_price_policy_id));
        assert_eq!(entry.price_dict.len(), 2);
    }

    #[tokio::test]
    async fn re_add_replaces_the_entry_wholesale() {
        let kv = Arc::new(InMemoryKv::new());
        let cart = usecase_with(
            vec![course_row(7, "Intro to Systems")],
            vec![policy_row(3, 7, 30, 19900), policy_row(4, 7, 90, 49900)],
            Arc::clone(&kv),
        );

        cart.add(5, 7, 3).await.unwrap();
        cart.add(5, 7, 4).await.unwrap();

        let entries = cart.get(5).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].default_price_policy_id, 4);
    }

    #[tokio::test]
    async fn add_unknown_course_fails() {
        let kv = Arc::new(InMemoryKv::new());
        let cart = usecase_with(vec![], vec![], Arc::clone(&kv));

        assert!(matches!(
            cart.add(5, 7, 3).await,
            Err(CartError::CourseNotFound)
        ));
    }

    #[tokio::test]
    async fn add_with_unknown_policy_fails() {
        let kv = Arc::new(InMemoryKv::new());
        let cart = usecase_with(
            vec![course_row(7, "Intro to Systems")],
            vec![policy_row(3, 7, 30, 19900)],
            Arc::clone(&kv),
        );

        assert!(matches!(
            cart.add(5, 7, 99).await,
            Err(CartError::PriceNotFound)
        ));
        assert!(cart.get(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_selection_without_entry_fails() {
        let kv = Arc::new(InMemoryKv::new());
        let cart = usecase_with(vec![], vec![], Arc::clone(&kv));

        assert!(matches!(
            cart.update_selection(5, 7, 3).await,
            Err(CartError::CartItemNotFound)
        ));
    }

    #[tokio::test]
    async fn update_selection_checks_the_stored_snapshot_not_the_catalog() {
        let kv = Arc::new(InMemoryKv::new());
        // Catalog knows policies 3 and 4; the entry was added when only 3
        // existed.
        let entry = CartEntry {
            course_id: 7,
            course_title: "Intro to Systems".to_string(),
            price_dict: [(
                3,
                PricePolicySnapshot {
                    price: Decimal::new(19900, 2),
                    valid_period: ValidPeriod::OneMonth,
                    valid_period_label: "1 month".to_string(),
                },
            )]
            .into_iter()
            .collect(),
            default_price_policy_id: 3,
        };
        kv.hash_set(
            CacheKey::cart(5, 7).as_str(),
            entry.to_hash_fields().unwrap(),
        )
        .await
        .unwrap();

        // Mocks with no expectations: any durable lookup panics the test.
        let cart = CartUseCase::new(
            Arc::new(MockCourseRepository::new()),
            Arc::new(PriceResolverUseCase::new(Arc::new(
                MockPricePolicyRepository::new(),
            ))),
            Arc::clone(&kv),
        );

        assert!(matches!(
            cart.update_selection(5, 7, 4).await,
            Err(CartError::PriceNotFound)
        ));

        cart.update_selection(5, 7, 3).await.unwrap();
        let entries = cart.get(5).await.unwrap();
        assert_eq!(entries[0].default_price_policy_id, 3);
    }

    #[tokio::test]
    async fn remove_deletes_the_key() {
        let kv = Arc::new(InMemoryKv::new());
        let cart = usecase_with(
            vec![course_row(7, "Intro to Systems")],
            vec![policy_row(3, 7, 30, 19900)],
            Arc::clone(&kv),
        );

        cart.add(5, 7, 3).await.unwrap();
        cart.remove(5, 7).await.unwrap();

        assert!(cart.get(5).await.unwrap().is_empty());
        assert!(matches!(
            cart.remove(5, 7).await,
            Err(CartError::CartItemNotFound)
        ));
    }

    #[tokio::test]
    async fn carts_are_per_account() {
        let kv = Arc::new(InMemoryKv::new());
        let cart = usecase_with(
            vec![course_row(7, "Intro to Systems")],
            vec![policy_row(3, 7, 30, 19900)],
            Arc::clone(&kv),
        );

        cart.add(5, 7, 3).await.unwrap();

        assert_eq!(cart.get(5).await.unwrap().len(), 1);
        assert!(cart.get(6).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_select_update_remove_scenario() {
        let kv = Arc::new(InMemoryKv::new());
        let cart = usecase_with(
            vec![course_row(7, "Intro to Systems")],
            vec![policy_row(3, 7, 30, 19900)],
            Arc::clone(&kv),
        );

        cart.add(5, 7, 3).await.unwrap();
        let entries = cart.get(5).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].default_price_policy_id, 3);
        assert_eq!(
            entries[0].price_dict[&3].price,
            Decimal::new(19900, 2)
        );
        assert_eq!(entries[0].price_dict[&3].valid_period.days(), 30);

        assert!(matches!(
            cart.update_selection(5, 7, 99).await,
            Err(CartError::PriceNotFound)
        ));

        cart.remove(5, 7).await.unwrap();
        assert!(cart.get(5).await.unwrap().is_empty());
    }
}
