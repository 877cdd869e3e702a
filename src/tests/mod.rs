mod support;

mod foundation_tests;
