mod property {
    mod messages;
    mod parse;
    mod rules;
}
