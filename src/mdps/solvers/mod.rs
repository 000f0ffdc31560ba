pub mod mc_control;
