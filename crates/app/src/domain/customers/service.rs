//! Customers service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::customers::{
        errors::CustomersServiceError,
        models::{Customer, CustomerUuid, NewCustomer},
        repository::PgCustomersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCustomersService {
    db: Db,
    repository: PgCustomersRepository,
}

impl PgCustomersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCustomersRepository::new(),
        }
    }
}

#[async_trait]
impl CustomersService for PgCustomersService {
    #[tracing::instrument(
        name = "customers.service.create_customer",
        skip(self, customer),
        fields(customer_uuid = %customer.uuid),
        err
    )]
    async fn create_customer(
        &self,
        customer: NewCustomer,
    ) -> Result<Customer, CustomersServiceError> {
        let mut tx = self.db.begin().await?;

        if self
            .repository
            .find_customer_by_email(&mut tx, &customer.email)
            .await?
            .is_some()
        {
            return Err(CustomersServiceError::AlreadyExists);
        }

        let created = self.repository.create_customer(&mut tx, &customer).await?;

        tx.commit().await?;

        info!(customer_uuid = %created.uuid, "created customer");

        Ok(created)
    }

    #[tracing::instrument(
        name = "customers.service.get_customer",
        skip(self),
        fields(customer_uuid = %customer),
        err
    )]
    async fn get_customer(&self, customer: CustomerUuid) -> Result<Customer, CustomersServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self.repository.get_customer(&mut tx, customer).await?;

        tx.commit().await?;

        Ok(found)
    }
}

#[automock]
#[async_trait]
pub trait CustomersService: Send + Sync {
    /// Register a customer. Email addresses are unique, ignoring case.
    async fn create_customer(
        &self,
        customer: NewCustomer,
    ) -> Result<Customer, CustomersServiceError>;

    async fn get_customer(&self, customer: CustomerUuid) -> Result<Customer, CustomersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    fn jane() -> NewCustomer {
        NewCustomer {
            uuid: CustomerUuid::new(),
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_get_customer() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx.customers.create_customer(jane()).await?;
        let found = ctx.customers.get_customer(created.uuid).await?;

        assert_eq!(found, created);
        assert_eq!(found.email, "jane@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn email_is_unique_ignoring_case() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.customers.create_customer(jane()).await?;

        let result = ctx
            .customers
            .create_customer(NewCustomer {
                email: "JANE@example.com".to_string(),
                ..jane()
            })
            .await;

        assert!(
            matches!(result, Err(CustomersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn malformed_email_is_invalid_data() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx
            .customers
            .create_customer(NewCustomer {
                email: "not-an-email".to_string(),
                ..jane()
            })
            .await;

        assert!(
            matches!(result, Err(CustomersServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_customer_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx.customers.get_customer(CustomerUuid::new()).await;

        assert!(
            matches!(result, Err(CustomersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
