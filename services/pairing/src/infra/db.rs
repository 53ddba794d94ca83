use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, SqlErr, TransactionError, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use couplet_pairing_schema::{couples, invite_codes, users};

use crate::domain::repository::{CoupleRepository, InviteCodeRepository, ProfileRepository};
use crate::domain::types::{Couple, InviteCode, Profile};
use crate::error::PairingServiceError;

// ── Profile repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProfileRepository {
    pub db: DatabaseConnection,
}

impl ProfileRepository for DbProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, PairingServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find profile by id")?;
        Ok(model.map(profile_from_model))
    }

    async fn upsert_identity(&self, id: Uuid, email: &str) -> Result<(), PairingServiceError> {
        let now = Utc::now();
        users::Entity::insert(users::ActiveModel {
            id: Set(id),
            email: Set(email.to_owned()),
            nickname: Set(None),
            avatar_url: Set(None),
            couple_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .on_conflict(
            OnConflict::column(users::Column::Id)
                .update_columns([users::Column::Email, users::Column::UpdatedAt])
                .to_owned(),
        )
        .exec(&self.db)
        .await
        .context("upsert profile identity")?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        nickname: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<(), PairingServiceError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(new_nickname) = nickname {
            am.nickname = Set(Some(new_nickname.to_owned()));
        }
        if let Some(new_avatar_url) = avatar_url {
            am.avatar_url = Set(Some(new_avatar_url.to_owned()));
        }
        am.updated_at = Set(Utc::now());
        match am.update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(PairingServiceError::UserNotFound),
            Err(e) => Err(anyhow::Error::new(e).context("update profile").into()),
        }
    }
}

fn profile_from_model(model: users::Model) -> Profile {
    Profile {
        id: model.id,
        email: model.email,
        nickname: model.nickname,
        avatar_url: model.avatar_url,
        couple_id: model.couple_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── InviteCode repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbInviteCodeRepository {
    pub db: DatabaseConnection,
}

impl InviteCodeRepository for DbInviteCodeRepository {
    async fn create(&self, code: &InviteCode) -> Result<bool, PairingServiceError> {
        let am = invite_codes::ActiveModel {
            id: Set(code.id),
            code: Set(code.code.clone()),
            created_by: Set(code.created_by),
            used: Set(false),
            used_by: Set(None),
            expires_at: Set(code.expires_at),
            created_at: Set(code.created_at),
        };
        match am.insert(&self.db).await {
            Ok(_) => Ok(true),
            // Code-string collision; the caller retries with a fresh code.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(false)
            }
            Err(e) => Err(anyhow::Error::new(e).context("create invite code").into()),
        }
    }

    async fn find_active_by_creator(
        &self,
        creator_id: Uuid,
    ) -> Result<Option<InviteCode>, PairingServiceError> {
        let now = Utc::now();
        let model = invite_codes::Entity::find()
            .filter(invite_codes::Column::CreatedBy.eq(creator_id))
            .filter(invite_codes::Column::Used.eq(false))
            .filter(invite_codes::Column::ExpiresAt.gt(now))
            .order_by_desc(invite_codes::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find active invite code")?;
        Ok(model.map(invite_code_from_model))
    }

    async fn find_unused_by_code(
        &self,
        code: &str,
    ) -> Result<Option<InviteCode>, PairingServiceError> {
        let model = invite_codes::Entity::find()
            .filter(invite_codes::Column::Code.eq(code))
            .filter(invite_codes::Column::Used.eq(false))
            .one(&self.db)
            .await
            .context("find invite code by code")?;
        Ok(model.map(invite_code_from_model))
    }

    async fn invalidate_all(&self, creator_id: Uuid) -> Result<u64, PairingServiceError> {
        let result = invite_codes::Entity::update_many()
            .col_expr(invite_codes::Column::Used, Expr::value(true))
            .filter(invite_codes::Column::CreatedBy.eq(creator_id))
            .filter(invite_codes::Column::Used.eq(false))
            .exec(&self.db)
            .await
            .context("invalidate invite codes")?;
        Ok(result.rows_affected)
    }
}

fn invite_code_from_model(model: invite_codes::Model) -> InviteCode {
    InviteCode {
        id: model.id,
        code: model.code,
        created_by: model.created_by,
        used: model.used,
        used_by: model.used_by,
        expires_at: model.expires_at,
        created_at: model.created_at,
    }
}

// ── Couple repository ────────────────────────────────────────────────────────

/// Which conditional write of the redeem transaction affected zero rows.
#[derive(Debug, Clone, Copy)]
enum PairRejection {
    /// The code row was consumed, regenerated away, or expired between the
    /// precondition check and the compare-and-swap — the losing side of a race.
    CodeUnavailable,
    CreatorAlreadyPaired,
    JoinerAlreadyPaired,
}

impl From<PairRejection> for PairingServiceError {
    fn from(rejection: PairRejection) -> Self {
        match rejection {
            PairRejection::CodeUnavailable => PairingServiceError::InvalidCode,
            PairRejection::CreatorAlreadyPaired => PairingServiceError::CreatorAlreadyPaired,
            PairRejection::JoinerAlreadyPaired => PairingServiceError::AlreadyPaired,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum RedeemTxnError {
    #[error("pairing rejected")]
    Rejected(PairRejection),
    #[error(transparent)]
    Db(#[from] DbErr),
}

#[derive(Clone)]
pub struct DbCoupleRepository {
    pub db: DatabaseConnection,
}

impl CoupleRepository for DbCoupleRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Couple>, PairingServiceError> {
        let model = couples::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find couple by id")?;
        Ok(model.map(couple_from_model))
    }

    async fn redeem(
        &self,
        code_id: Uuid,
        creator_id: Uuid,
        joiner_id: Uuid,
    ) -> Result<Couple, PairingServiceError> {
        let result = self
            .db
            .transaction::<_, couples::Model, RedeemTxnError>(|txn| {
                Box::pin(async move {
                    let now = Utc::now();

                    // Compare-and-swap on the code row serializes concurrent
                    // redemptions: exactly one joiner flips `used`.
                    let consumed = invite_codes::Entity::update_many()
                        .col_expr(invite_codes::Column::Used, Expr::value(true))
                        .col_expr(invite_codes::Column::UsedBy, Expr::value(joiner_id))
                        .filter(invite_codes::Column::Id.eq(code_id))
                        .filter(invite_codes::Column::Used.eq(false))
                        .filter(invite_codes::Column::ExpiresAt.gt(now))
                        .exec(txn)
                        .await?;
                    if consumed.rows_affected == 0 {
                        return Err(RedeemTxnError::Rejected(PairRejection::CodeUnavailable));
                    }

                    let couple = couples::ActiveModel {
                        id: Set(Uuid::now_v7()),
                        user1_id: Set(creator_id),
                        user2_id: Set(joiner_id),
                        couple_name: Set(None),
                        start_date: Set(now),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(txn)
                    .await?;

                    // Back-fill both foreign keys only while still unpaired;
                    // zero rows means the member paired elsewhere meanwhile.
                    for (member_id, rejection) in [
                        (creator_id, PairRejection::CreatorAlreadyPaired),
                        (joiner_id, PairRejection::JoinerAlreadyPaired),
                    ] {
                        let updated = users::Entity::update_many()
                            .col_expr(users::Column::CoupleId, Expr::value(couple.id))
                            .col_expr(users::Column::UpdatedAt, Expr::value(now))
                            .filter(users::Column::Id.eq(member_id))
                            .filter(users::Column::CoupleId.is_null())
                            .exec(txn)
                            .await?;
                        if updated.rows_affected == 0 {
                            return Err(RedeemTxnError::Rejected(rejection));
                        }
                    }

                    Ok(couple)
                })
            })
            .await;

        match result {
            Ok(model) => Ok(couple_from_model(model)),
            Err(TransactionError::Transaction(RedeemTxnError::Rejected(rejection))) => {
                Err(rejection.into())
            }
            Err(TransactionError::Transaction(RedeemTxnError::Db(e))) => {
                Err(anyhow::Error::new(e).context("redeem invite code").into())
            }
            Err(TransactionError::Connection(e)) => {
                Err(anyhow::Error::new(e).context("redeem invite code").into())
            }
        }
    }

    async fn dissolve(&self, couple_id: Uuid) -> Result<bool, PairingServiceError> {
        let deleted = self
            .db
            .transaction::<_, u64, DbErr>(|txn| {
                Box::pin(async move {
                    users::Entity::update_many()
                        .col_expr(users::Column::CoupleId, Expr::value(Option::<Uuid>::None))
                        .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
                        .filter(users::Column::CoupleId.eq(couple_id))
                        .exec(txn)
                        .await?;

                    let result = couples::Entity::delete_many()
                        .filter(couples::Column::Id.eq(couple_id))
                        .exec(txn)
                        .await?;
                    Ok(result.rows_affected)
                })
            })
            .await
            .context("dissolve couple")?;
        Ok(deleted > 0)
    }
}

fn couple_from_model(model: couples::Model) -> Couple {
    Couple {
        id: model.id,
        user1_id: model.user1_id,
        user2_id: model.user2_id,
        couple_name: model.couple_name,
        start_date: model.start_date,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
