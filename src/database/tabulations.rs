use crate::{
    api::middleware::error::{ApiError, ApiResult},
    database::Database,
    models::{ProductType, Tabulation},
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

impl Database {
    pub async fn create_tabulation(&self, tabulation: &Tabulation) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO tabulations (id, operator_id, product, outcome, remarks, promise_date, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&tabulation.id)
        .bind(&tabulation.operator_id)
        .bind(tabulation.product.as_str())
        .bind(&tabulation.outcome)
        .bind(&tabulation.remarks)
        .bind(&tabulation.promise_date)
        .bind(&tabulation.created_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    pub async fn get_tabulation(&self, id: &str) -> ApiResult<Option<Tabulation>> {
        let row = sqlx::query("SELECT * FROM tabulations WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.map(|r| tabulation_from_row(&r)).transpose()
    }

    /// Newest first, with optional operator and product filters.
    pub async fn list_tabulations(
        &self,
        operator_id: Option<&str>,
        product: Option<ProductType>,
        limit: i64,
        offset: i64,
    ) -> ApiResult<(Vec<Tabulation>, i64)> {
        // Filters are optional; `?` pairs of (value, flag) keep the query static.
        let operator_flag = operator_id.is_some();
        let product_flag = product.is_some();
        let operator_value = operator_id.unwrap_or("");
        let product_value = product.map(|p| p.as_str()).unwrap_or("");

        let rows = sqlx::query(
            "SELECT * FROM tabulations
             WHERE (? = 0 OR operator_id = ?) AND (? = 0 OR product = ?)
             ORDER BY created_at DESC LIMIT ? OFFSET ?",
        )
        .bind(operator_flag)
        .bind(operator_value)
        .bind(product_flag)
        .bind(product_value)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tabulations
             WHERE (? = 0 OR operator_id = ?) AND (? = 0 OR product = ?)",
        )
        .bind(operator_flag)
        .bind(operator_value)
        .bind(product_flag)
        .bind(product_value)
        .fetch_one(self.pool())
        .await?;

        let tabulations = rows
            .iter()
            .map(tabulation_from_row)
            .collect::<ApiResult<Vec<_>>>()?;

        Ok((tabulations, total))
    }

    pub async fn delete_tabulation(&self, id: &str) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM tabulations WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("Tabulation {} not found", id)));
        }

        Ok(())
    }
}

fn tabulation_from_row(row: &SqliteRow) -> ApiResult<Tabulation> {
    let product_str: String = row.try_get("product")?;
    let product = ProductType::parse(&product_str)
        .ok_or_else(|| ApiError::Internal(format!("Unknown product type: {}", product_str)))?;

    Ok(Tabulation {
        id: row.try_get("id")?,
        operator_id: row.try_get("operator_id")?,
        product,
        outcome: row.try_get("outcome")?,
        remarks: row.try_get("remarks")?,
        promise_date: row.try_get("promise_date")?,
        created_at: row.try_get("created_at")?,
    })
}
