pub mod optimal_growth;
