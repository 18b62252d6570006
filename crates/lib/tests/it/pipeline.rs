use std::fs;
use std::io::Read as _;

use strata::dom::{Container, Value};
use strata::pipeline::{ActionContext, ActionSpec, Executor, Recording};

use crate::helpers::{leaf_text, yaml};

fn run(pipeline: &str, data: Container) -> (Container, Recording) {
    let recorder = Recording::new();
    let ctx = ActionContext::with_data(data).with_listener(Box::new(recorder.clone()));
    let mut executor = Executor::from_context(ctx);
    let spec: ActionSpec = serde_yaml::from_str(pipeline).unwrap();
    executor.run(&spec).unwrap();
    (executor.into_data(), recorder)
}

#[test]
fn define_for_each_call_logs_every_item() {
    let pipeline = "\
name: root
steps:
  setup:
    order: 1
    define:
      name: echo
      action:
        log:
          message: '{{ myargs.msg }}'
  fanout:
    order: 2
    forEach:
      items:
        - a
        - b
      action:
        call:
          name: echo
          argsPath: myargs
          args:
            msg: '{{ forEach }}'
";
    let (data, recorder) = run(pipeline, Container::new());
    assert_eq!(recorder.logs(), ["a", "b"]);
    // The iteration variable and call arguments are gone afterwards.
    assert!(data.leaf("forEach").is_none());
    assert!(data.leaf("myargs.msg").is_none());
}

#[test]
fn set_template_and_convert_compose() {
    let pipeline = "\
steps:
  seed:
    order: 1
    set:
      data:
        server:
          host: db.local
          port: '5432'
  render:
    order: 2
    template:
      template: 'jdbc://{{ server.host }}:{{ server.port }}/app'
      path: server.url
  coerce:
    order: 3
    convert:
      path: server.port
      to: int64
";
    let (data, _) = run(pipeline, Container::new());
    assert_eq!(leaf_text(&data, "server.url"), "jdbc://db.local:5432/app");
    assert_eq!(data.leaf("server.port"), Some(&Value::Int(5432)));
}

#[test]
fn import_patch_export_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.yaml");
    fs::write(&input, "app:\n  replicas: 1\n  name: web\n").unwrap();
    let output = dir.path().join("out.json");

    let pipeline = format!(
        "\
steps:
  load:
    order: 1
    import:
      file: {input}
  bump:
    order: 2
    patch:
      op: replace
      path: app.replicas
      value: 3
  save:
    order: 3
    export:
      file: {output}
",
        input = input.display(),
        output = output.display(),
    );
    let (data, _) = run(&pipeline, Container::new());
    assert_eq!(data.leaf("app.replicas"), Some(&Value::Int(3)));

    let mut file = fs::File::open(&output).unwrap();
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();
    let exported = strata::codec::Format::Json.decode_str(&text).unwrap();
    assert_eq!(exported, data);
}

#[test]
fn when_conditions_and_ignore_policy_shape_execution() {
    let pipeline = "\
steps:
  skipped:
    order: 1
    when: '{{ enabled }}'
    log:
      message: never
  tolerant:
    order: 2
    errorPropagation: ignore
    steps:
      failing:
        order: 1
        abort:
          message: swallowed
      after:
        order: 2
        log:
          message: still-ran
";
    let (_, recorder) = run(pipeline, yaml("enabled: false\n"));
    assert_eq!(recorder.logs(), ["still-ran"]);
}

#[test]
fn aborts_surface_with_their_rendered_message() {
    let spec: ActionSpec =
        serde_yaml::from_str("abort:\n  message: 'no handler for {{ kind }}'\n").unwrap();
    let mut executor = Executor::from_context(ActionContext::with_data(yaml("kind: webhook\n")));
    let err = executor.run(&spec).unwrap_err();
    assert_eq!(err.to_string(), "abort: no handler for webhook");
}

#[test]
fn loops_consume_their_queue() {
    let pipeline = "\
loop:
  test: '{{ queue | length > 0 }}'
  action:
    log:
      message: '{{ queue[0] }}'
    steps:
      pop:
        patch:
          op: remove
          path: /queue/0
";
    let (data, recorder) = run(pipeline, yaml("queue:\n  - first\n  - second\n"));
    assert_eq!(recorder.logs(), ["first", "second"]);
    let queue = data.lookup("queue").unwrap().unwrap().as_list().unwrap();
    assert!(queue.is_empty());
}

#[test]
fn template_file_renders_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("greeting.tmpl");
    fs::write(&template, "hello {{ who }}").unwrap();
    let output = dir.path().join("greeting.txt");

    let pipeline = format!(
        "\
templateFile:
  file: {template}
  output: {output}
",
        template = template.display(),
        output = output.display(),
    );
    run(&pipeline, yaml("who: world\n"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "hello world");
}

#[test]
fn for_each_over_globbed_files() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["one.yaml", "two.yaml"] {
        fs::write(dir.path().join(name), "x: 1\n").unwrap();
    }

    let pipeline = format!(
        "\
forEach:
  glob: '{}/*.yaml'
  var: file
  action:
    log:
      message: '{{{{ file }}}}'
",
        dir.path().display(),
    );
    let (_, recorder) = run(&pipeline, Container::new());
    let mut logged = recorder.logs();
    logged.sort();
    assert_eq!(logged.len(), 2);
    assert!(logged[0].ends_with("one.yaml"));
    assert!(logged[1].ends_with("two.yaml"));
}
