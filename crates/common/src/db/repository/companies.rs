use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use uuid::Uuid;

use super::{contains_ci, Repository};
use crate::db::models::*;
use crate::errors::Result;

pub const SEARCH_LIMIT: u64 = 10;

impl Repository {
    // ========================================================================
    // Company Operations
    // ========================================================================

    /// Active companies whose name, website or industry contains the query
    pub async fn search_companies(&self, query: &str) -> Result<Vec<Company>> {
        CompanyEntity::find()
            .filter(CompanyColumn::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(contains_ci((CompanyEntity, CompanyColumn::Name), query))
                    .add(contains_ci((CompanyEntity, CompanyColumn::Website), query))
                    .add(contains_ci((CompanyEntity, CompanyColumn::Industry), query)),
            )
            .order_by_asc(CompanyColumn::Name)
            .limit(SEARCH_LIMIT)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn find_company(&self, id: Uuid) -> Result<Option<Company>> {
        CompanyEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn find_companies_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<Company>> {
        CompanyEntity::find()
            .filter(CompanyColumn::Id.is_in(ids))
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Active company whose trimmed name matches case-insensitively
    pub async fn find_active_company_by_name(
        &self,
        name: &str,
        excluding: Option<Uuid>,
    ) -> Result<Option<Company>> {
        let mut query = CompanyEntity::find()
            .filter(CompanyColumn::IsActive.eq(true))
            .filter(Expr::cust_with_values(
                "LOWER(TRIM(\"companies\".\"name\")) = $1",
                [name.trim().to_lowercase()],
            ));
        if let Some(id) = excluding {
            query = query.filter(CompanyColumn::Id.ne(id));
        }

        query.one(self.write_conn()).await.map_err(Into::into)
    }

    /// Insert a company and make the creating employer its ADMIN, atomically
    pub async fn create_company_with_admin(
        &self,
        company: CompanyActiveModel,
        employer: Employer,
    ) -> Result<(Company, Employer)> {
        let txn = self.write_conn().begin().await?;

        let company = company.insert(&txn).await?;

        let now = chrono::Utc::now();
        let mut active: EmployerActiveModel = employer.into();
        active.company_id = Set(Some(company.id));
        active.company_role = Set(CompanyRole::Admin);
        active.joined_company_at = Set(Some(now.into()));
        active.updated_at = Set(now.into());
        let employer = active.update(&txn).await?;

        txn.commit().await?;
        Ok((company, employer))
    }

    /// Point an employer at a company with the given role
    pub async fn assign_employer_company(
        &self,
        employer: Employer,
        company_id: Uuid,
        role: CompanyRole,
    ) -> Result<Employer> {
        let now = chrono::Utc::now();
        let mut active: EmployerActiveModel = employer.into();
        active.company_id = Set(Some(company_id));
        active.company_role = Set(role);
        active.joined_company_at = Set(Some(now.into()));
        active.updated_at = Set(now.into());

        active.update(self.write_conn()).await.map_err(Into::into)
    }

    /// Most recent active postings of a company
    pub async fn recent_company_jobs(&self, company_id: Uuid, limit: u64) -> Result<Vec<Job>> {
        JobEntity::find()
            .filter(JobColumn::CompanyId.eq(company_id))
            .filter(JobColumn::Status.eq(JobStatus::Active))
            .order_by_desc(JobColumn::CreatedAt)
            .limit(limit)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }
}
