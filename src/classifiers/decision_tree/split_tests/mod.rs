mod numerical_test;
mod test_score;

pub use numerical_test::NumericalTest;
pub use split_test::{SplitTest, Test};
pub use symbolic_test::SymbolicTest;
pub use test_score::TestScore;
