//! Ownership-scoped queries over persons and salary records.
//!
//! Every query takes the caller's user id; a person or record that exists
//! but belongs to another user is reported exactly like a missing one.

use compute::{parse_range, PeriodRange};
use model::entities::{person, salary_record};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use tracing::{debug, instrument};

use crate::error::{ApiError, ApiResult};
use crate::schemas::StatsQuery;

#[instrument(skip(db))]
pub async fn owned_persons(db: &DatabaseConnection, user_id: i32) -> Result<Vec<person::Model>, DbErr> {
    person::Entity::find()
        .filter(person::Column::UserId.eq(user_id))
        .order_by_asc(person::Column::Id)
        .all(db)
        .await
}

#[instrument(skip(db))]
pub async fn find_owned_person(
    db: &DatabaseConnection,
    user_id: i32,
    person_id: i32,
) -> ApiResult<person::Model> {
    person::Entity::find_by_id(person_id)
        .filter(person::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Person {person_id}")))
}

#[instrument(skip(db))]
pub async fn find_owned_record(
    db: &DatabaseConnection,
    user_id: i32,
    record_id: i32,
) -> ApiResult<salary_record::Model> {
    salary_record::Entity::find_by_id(record_id)
        .join(JoinType::InnerJoin, salary_record::Relation::Person.def())
        .filter(person::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Salary record {record_id}")))
}

/// True when `person_id` already has a record for the month, other than
/// `except_id`.
pub async fn record_exists(
    db: &DatabaseConnection,
    person_id: i32,
    year: i32,
    month: i32,
    except_id: Option<i32>,
) -> Result<bool, DbErr> {
    let mut query = salary_record::Entity::find()
        .filter(salary_record::Column::PersonId.eq(person_id))
        .filter(salary_record::Column::Year.eq(year))
        .filter(salary_record::Column::Month.eq(month));
    if let Some(id) = except_id {
        query = query.filter(salary_record::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

/// Record filters of the listing and statistics endpoints.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub person_id: Option<i32>,
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub range: Option<PeriodRange>,
}

impl RecordFilter {
    pub fn from_query(query: &StatsQuery) -> Self {
        Self {
            person_id: query.person_id,
            year: query.year,
            month: query.month,
            range: query.range.as_deref().map(parse_range),
        }
    }
}

/// Records of the caller's persons matching `filter`, ordered by year,
/// month and person.
#[instrument(skip(db))]
pub async fn query_records(
    db: &DatabaseConnection,
    user_id: i32,
    filter: &RecordFilter,
) -> Result<Vec<salary_record::Model>, DbErr> {
    let mut query = salary_record::Entity::find()
        .join(JoinType::InnerJoin, salary_record::Relation::Person.def())
        .filter(person::Column::UserId.eq(user_id));

    if let Some(person_id) = filter.person_id {
        query = query.filter(salary_record::Column::PersonId.eq(person_id));
    }
    if let Some(year) = filter.year {
        query = query.filter(salary_record::Column::Year.eq(year));
    }
    if let Some(month) = filter.month {
        query = query.filter(salary_record::Column::Month.eq(month));
    }
    if let Some(range) = filter.range {
        // Coarse year bounds in SQL, exact month bounds below
        query = query
            .filter(salary_record::Column::Year.gte(range.start_year()))
            .filter(salary_record::Column::Year.lte(range.end_year()));
    }

    let mut records = query
        .order_by_asc(salary_record::Column::Year)
        .order_by_asc(salary_record::Column::Month)
        .order_by_asc(salary_record::Column::PersonId)
        .all(db)
        .await?;

    if let Some(range) = filter.range {
        records.retain(|record| range.contains(record.year, record.month));
    }

    debug!("Found {} salary records", records.len());
    Ok(records)
}
