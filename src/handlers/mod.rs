pub mod bootcamps;
