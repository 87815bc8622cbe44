use streak_core::entities::UserRecord;
use streak_core::value_objects::UserId;

use crate::models::UserRecordModel;

impl From<UserRecordModel> for UserRecord {
    fn from(model: UserRecordModel) -> Self {
        UserRecord {
            id: UserId::new(model.id),
            username: model.username,
            xp: model.xp,
            streak: model.streak,
            max_streak: model.max_streak,
            frozen_days: model.frozen_days,
            last_checkin: model.last_checkin,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
