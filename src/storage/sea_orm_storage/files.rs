//! 文件存储操作

use super::SeaOrmStorage;
use crate::entity::files::{ActiveModel, Entity as Files};
use crate::errors::{EducafricError, Result};
use crate::models::files::{File, NewFile};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

impl SeaOrmStorage {
    /// 上传文件（创建文件记录）
    pub async fn create_file_impl(&self, file: NewFile) -> Result<File> {
        let model = ActiveModel {
            file_token: Set(file.file_token),
            file_name: Set(file.file_name),
            file_size: Set(file.file_size),
            file_type: Set(file.file_type),
            uploaded_at: Set(chrono::Utc::now().timestamp()),
            uploader_id: Set(file.uploader_id),
            school_id: Set(file.school_id),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("上传文件记录失败: {e}")))?;

        Ok(result.into_file())
    }

    /// 通过 token 获取文件
    pub async fn get_file_by_token_impl(&self, token: &str) -> Result<Option<File>> {
        let result = Files::find_by_id(token.to_string())
            .one(&self.db)
            .await
            .map_err(|e| EducafricError::database_operation(format!("查询文件失败: {e}")))?;

        Ok(result.map(|m| m.into_file()))
    }
}
