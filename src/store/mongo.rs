//! MongoDB-backed loan store

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, DateTime as BsonDateTime, Document},
    options::ReturnDocument,
    Client, Collection, Database,
};
use serde::{Deserialize, Serialize};

use super::{LoanStore, StoreError};
use crate::config::Config;
use crate::loan::{Loan, LoanStatus, NewLoan};

const COLLECTION: &str = "loans";

/// BSON shape of a document in the `loans` collection.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoanDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    id_number: i64,
    full_name: String,
    loan_amount: f64,
    loan_tenure: i64,
    employment_status: String,
    reason_for_loan: String,
    employment_address: String,
    status: LoanStatus,
    loan_officer: String,
    created_at: BsonDateTime,
    updated_at: BsonDateTime,
}

impl From<LoanDocument> for Loan {
    fn from(doc: LoanDocument) -> Self {
        Loan {
            id: doc.id.to_hex(),
            id_number: doc.id_number,
            full_name: doc.full_name,
            loan_amount: doc.loan_amount,
            loan_tenure: doc.loan_tenure,
            employment_status: doc.employment_status,
            reason_for_loan: doc.reason_for_loan,
            employment_address: doc.employment_address,
            status: doc.status,
            loan_officer: doc.loan_officer,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        }
    }
}

/// Loan store backed by a MongoDB database.
#[derive(Clone)]
pub struct MongoLoanStore {
    database: Database,
}

impl MongoLoanStore {
    /// Connect to the store and verify the connection with a ping.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.mongo_uri).await?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(&config.mongo_db));

        let store = Self { database };
        store.ping().await?;
        Ok(store)
    }

    fn collection(&self) -> Collection<LoanDocument> {
        self.database.collection(COLLECTION)
    }

    fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
        ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
    }

    fn status_filter(statuses: &[LoanStatus]) -> Document {
        let values: Vec<Bson> = statuses
            .iter()
            .map(|s| Bson::String(s.as_str().to_string()))
            .collect();
        doc! { "status": { "$in": values } }
    }
}

#[async_trait]
impl LoanStore for MongoLoanStore {
    async fn insert_loan(&self, loan: NewLoan) -> Result<Loan, StoreError> {
        let now = BsonDateTime::now();
        let document = LoanDocument {
            id: ObjectId::new(),
            id_number: loan.id_number,
            full_name: loan.full_name,
            loan_amount: loan.loan_amount,
            loan_tenure: loan.loan_tenure,
            employment_status: loan.employment_status,
            reason_for_loan: loan.reason_for_loan,
            employment_address: loan.employment_address,
            status: loan.status,
            loan_officer: loan.loan_officer,
            created_at: now,
            updated_at: now,
        };

        self.collection().insert_one(&document).await?;
        Ok(document.into())
    }

    async fn loans_with_status(&self, statuses: &[LoanStatus]) -> Result<Vec<Loan>, StoreError> {
        let docs: Vec<LoanDocument> = self
            .collection()
            .find(Self::status_filter(statuses))
            .await?
            .try_collect()
            .await?;

        Ok(docs.into_iter().map(Loan::from).collect())
    }

    async fn loans_for_applicant(&self, id_number: i64) -> Result<Vec<Loan>, StoreError> {
        let docs: Vec<LoanDocument> = self
            .collection()
            .find(doc! { "idNumber": id_number })
            .await?
            .try_collect()
            .await?;

        Ok(docs.into_iter().map(Loan::from).collect())
    }

    async fn update_loan_status(
        &self,
        id: &str,
        status: LoanStatus,
        loan_officer: Option<&str>,
    ) -> Result<Option<Loan>, StoreError> {
        let oid = Self::parse_id(id)?;

        let mut set = doc! {
            "status": status.as_str(),
            "updatedAt": BsonDateTime::now(),
        };
        if let Some(officer) = loan_officer {
            set.insert("loanOfficer", officer);
        }

        let updated = self
            .collection()
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated.map(Loan::from))
    }

    async fn distinct_applicant_count(&self, exclude_pending: bool) -> Result<u64, StoreError> {
        let filter = if exclude_pending {
            doc! { "status": { "$ne": LoanStatus::Pending.as_str() } }
        } else {
            doc! {}
        };

        let values = self.collection().distinct("idNumber", filter).await?;
        Ok(values.len() as u64)
    }

    async fn count_with_status(&self, status: LoanStatus) -> Result<u64, StoreError> {
        let count = self
            .collection()
            .count_documents(doc! { "status": status.as_str() })
            .await?;
        Ok(count)
    }

    async fn total_amount_with_status(&self, status: LoanStatus) -> Result<f64, StoreError> {
        let pipeline = vec![
            doc! { "$match": { "status": status.as_str() } },
            doc! { "$group": { "_id": null, "total": { "$sum": "$loanAmount" } } },
        ];

        let mut cursor = self.collection().aggregate(pipeline).await?;
        let total = match cursor.try_next().await? {
            Some(group) => group.get_f64("total").unwrap_or(0.0),
            None => 0.0,
        };

        Ok(total)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
