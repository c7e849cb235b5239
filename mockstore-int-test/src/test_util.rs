use mockstore::collection::{CollectionReference, Document};
use mockstore::errors::MockStoreResult;
use mockstore::MockStore;
use std::time::Instant;

/// Runs `test` against the context built by `before`, then always runs
/// `after`. Failures from any stage fail the test with the stage named.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> MockStoreResult<()>,
    B: Fn() -> MockStoreResult<TestContext>,
    A: Fn(TestContext) -> MockStoreResult<()>,
{
    let start_time = Instant::now();
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let test_result = test(ctx.clone());
    let after_result = after(ctx);

    if let Err(e) = test_result {
        eprintln!("\n==================== TEST FAILED ====================");
        eprintln!("Took {:?}", start_time.elapsed());
        panic!("Test failed: {:?}", e);
    }
    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}

#[derive(Clone)]
pub struct TestContext {
    store: MockStore,
}

impl TestContext {
    pub fn new(store: MockStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> MockStore {
        self.store.clone()
    }
}

pub fn create_test_context() -> MockStoreResult<TestContext> {
    let store = MockStore::builder().open()?;
    Ok(TestContext::new(store))
}

/// A context whose store starts with `users/{alice,bob,carol}`.
pub fn create_seeded_test_context() -> MockStoreResult<TestContext> {
    let store = MockStore::builder().initial_data(seed_data()).open()?;
    Ok(TestContext::new(store))
}

pub fn cleanup(ctx: TestContext) -> MockStoreResult<()> {
    ctx.store().reset();
    assert!(ctx.store().collections().is_empty());
    Ok(())
}

pub fn seed_data() -> Document {
    mockstore::doc! {
        users: {
            alice: { name: "Alice", age: 30, address: { city: "Paris", zip: 75001 } },
            bob: { name: "Bob", age: 40 },
            carol: {
                name: "Carol",
                age: 50,
                orders: {
                    o1: { total: 12 },
                    o2: { total: 30 },
                },
            },
        },
    }
}

/// Ids of the documents in `collection`, in order.
pub fn document_ids(collection: &CollectionReference) -> MockStoreResult<Vec<String>> {
    Ok(collection
        .list_documents()?
        .iter()
        .map(|it| it.id().to_string())
        .collect())
}
