//! Table key schema shared by the Lambda and the test-table setup.

/// Partition key attribute name. Holds `Record::group_id`.
pub const PARTITION_KEY: &str = "groupId";

/// Sort key attribute name. Holds `Record::id`.
pub const SORT_KEY: &str = "id";
