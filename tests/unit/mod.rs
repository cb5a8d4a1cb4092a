mod bootstrap_tests;

mod refresh_tests;

mod service_tests;
