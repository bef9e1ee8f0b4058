use storage::{
    Database, dto::racer::NumberAssignment, error::Result,
    repository::numbering::NumberingAllocator,
};

pub async fn assign_next(db: &Database, racer_ids: &[i64]) -> Result<Vec<NumberAssignment>> {
    NumberingAllocator::new(db).assign_next(racer_ids).await
}

pub async fn fill_gaps(db: &Database, racer_ids: &[i64]) -> Result<Vec<NumberAssignment>> {
    NumberingAllocator::new(db).assign_smallest_unused(racer_ids).await
}
