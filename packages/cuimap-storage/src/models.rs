#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct SynonymRow {
	pub cui: String,
	pub synonym: String,
	pub semantic: String,
	pub representative: String,
	pub in_use: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewSynonym {
	pub cui: String,
	pub semantic: String,
	pub synonym: String,
	pub representative: String,
	pub in_use: bool,
}
