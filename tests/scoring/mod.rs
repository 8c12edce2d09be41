mod scorer_tests;
