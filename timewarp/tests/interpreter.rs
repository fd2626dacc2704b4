use timewarp::{base_env, eval_line, read_str, Error, Value};

fn run(src: &str) -> Result<Value, Error> {
    let env = base_env();
    eval_line(src, &env).map(|v| v.unwrap_or(Value::Unit))
}

#[test]
fn test_programs() {
    let test_cases = [
        ("(+ 1 2 3)", Value::Int(6)),
        ("(if (< 1 2) \"a\" \"b\")", Value::text("a")),
        ("((lambda (x) (+ x 1)) 5)", Value::Int(6)),
        ("(((lambda (x) (lambda (y) (- x y))) 10) 3)", Value::Int(7)),
        ("((lambda xs xs) 1 \"two\" 'three)", read_str("(1 \"two\" three)").unwrap()),
        ("(do (print 1) (list #t #f))", Value::List(vec![Value::Bool(true), Value::Bool(false)])),
        ("(eval (list '+ 1 2))", Value::Int(3)),
        ("(not (= (* 6 7) 42))", Value::Bool(false)),
    ];
    for (src, expected) in test_cases {
        assert_eq!(run(src).unwrap(), expected, "{}", src);
    }
}

#[test]
fn test_closure_outlives_its_frame() {
    let env = base_env();
    let make_counter = "((lambda (base) (do (print base) (lambda (n) (+ base n)))) 100)";
    let add_base = eval_line(make_counter, &env).unwrap().unwrap();
    for n in 0..3 {
        let call = Value::List(vec![add_base.clone(), Value::Int(n)]);
        assert_eq!(timewarp::eval(&call, &env).unwrap(), Value::Int(100 + n));
    }
}

#[test]
fn test_recursion_through_self_application() {
    let src = "((lambda (fact) (fact fact 5)) \
               (lambda (self n) (if (<= n 1) 1 (* n (self self (- n 1))))))";
    assert_eq!(run(src).unwrap(), Value::Int(120));
}

#[test]
fn test_blank_and_comment_lines() {
    let env = base_env();
    assert!(eval_line("", &env).unwrap().is_none());
    assert!(eval_line("   ; nothing here", &env).unwrap().is_none());
}

#[test]
fn test_lookup_error_without_history() {
    match run("(+ 1 undefined-name)") {
        Err(Error::Lookup(sym)) => assert_eq!(sym.name(), "undefined-name"),
        other => panic!("expected lookup error, got {:?}", other),
    }
}

#[test]
fn test_errors_carry_messages() {
    let test_cases = [
        ("(+ 1", "syntax error: expected close paren"),
        ("nope", "lookup error: nope"),
        ("((lambda (a) a))", "arity mismatch: expected 1 argument(s), got 0"),
        ("(/ 1 0)", "division by zero"),
    ];
    for (src, message) in test_cases {
        assert_eq!(run(src).unwrap_err().to_string(), message);
    }
}
